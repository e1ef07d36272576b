//! Database models

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// User model (a stored credential plus its role flags)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub is_handler: bool,
}

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub pid: i64,
    pub product_name: String,
}

/// Sales transaction model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub tid: i64,
    pub transaction_date: DateTime<Utc>,
    /// Product ID
    pub product: i64,
    pub transaction_count: f64,
    pub price: f64,
    /// Always `transaction_count * price`, computed by the store
    pub estimated_total: f64,
    pub actual_total: f64,
    pub handler1: i64,
    pub handler2: Option<i64>,
    pub handler3: Option<i64>,
    pub remarks: Option<String>,
}

/// New user (for insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub is_handler: bool,
}

/// Partial user update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub is_admin: Option<bool>,
    pub is_handler: Option<bool>,
}

/// New transaction (for insertion)
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub transaction_date: DateTime<Utc>,
    pub product: i64,
    pub transaction_count: f64,
    pub price: f64,
    pub actual_total: f64,
    pub handler1: i64,
    pub handler2: Option<i64>,
    pub handler3: Option<i64>,
    pub remarks: Option<String>,
}

/// Partial transaction update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    pub transaction_date: Option<DateTime<Utc>>,
    pub product: Option<i64>,
    pub transaction_count: Option<f64>,
    pub price: Option<f64>,
    pub actual_total: Option<f64>,
    pub handler1: Option<i64>,
    pub handler2: Option<i64>,
    pub handler3: Option<i64>,
    pub remarks: Option<String>,
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(User {
            uid: row.try_get("uid")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            is_admin: row.try_get("is_admin")?,
            is_handler: row.try_get("is_handler")?,
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Product {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Product {
            pid: row.try_get("pid")?,
            product_name: row.try_get("product_name")?,
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Transaction {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Transaction {
            tid: row.try_get("tid")?,
            transaction_date: parse_datetime_or_now(&row.try_get::<String, _>("transaction_date")?),
            product: row.try_get("product")?,
            transaction_count: row.try_get("transaction_count")?,
            price: row.try_get("price")?,
            estimated_total: row.try_get("estimated_total")?,
            actual_total: row.try_get("actual_total")?,
            handler1: row.try_get("handler1")?,
            handler2: row.try_get("handler2")?,
            handler3: row.try_get("handler3")?,
            remarks: row.try_get("remarks")?,
        })
    }
}
