//! Authentication error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// A required request field was absent or empty
    #[error("{0} not provided")]
    MissingField(&'static str),

    /// Unknown user or wrong password; the two are never distinguished
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Authorization token not provided")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sales_db::DbError),

    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Token encoding error: {0}")]
    TokenEncoding(jsonwebtoken::errors::Error),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("Failed to read secret from {path}: {source}")]
    SecretRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Secret file {0} is empty")]
    EmptySecret(String),
}

impl AuthError {
    /// Whether the error is a server-side fault rather than a rejection
    /// of the caller's input or credentials.
    pub fn is_internal(&self) -> bool {
        !matches!(
            self,
            AuthError::MissingField(_)
                | AuthError::InvalidCredentials
                | AuthError::MissingToken
                | AuthError::InvalidToken
                | AuthError::TokenExpired
                | AuthError::Forbidden
        )
    }
}
