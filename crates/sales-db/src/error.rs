//! Database error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(sqlx::Error),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Classify driver errors so callers can tell uniqueness and
/// foreign key failures apart from genuine faults.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return DbError::Duplicate(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return DbError::Constraint(db_err.message().to_string());
            }
        }
        DbError::Connection(err)
    }
}
