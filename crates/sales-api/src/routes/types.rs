//! Request/Response DTOs

use serde::{Deserialize, Deserializer, Serialize};

use sales_db::User;

/// Role flags arrive as `true`/`false` or `0`/`1`
#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Int(i64),
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<FlagRepr>::deserialize(deserializer)?;
    Ok(repr.map(|flag| match flag {
        FlagRepr::Bool(b) => b,
        FlagRepr::Int(i) => i != 0,
    }))
}

// ==================== Auth Types ====================

/// Login request; fields are checked by the authenticator
#[derive(Deserialize, Default)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

// ==================== User Types ====================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_admin: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_handler: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub uid: Option<i64>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_admin: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_handler: Option<bool>,
}

#[derive(Deserialize)]
pub struct DeleteUserRequest {
    pub uid: Option<i64>,
}

/// User response (without password hash)
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub uid: i64,
    pub username: String,
    pub is_admin: bool,
    pub is_handler: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            uid: user.uid,
            username: user.username,
            is_admin: user.is_admin,
            is_handler: user.is_handler,
        }
    }
}

// ==================== Product Types ====================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub product_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub pid: Option<i64>,
    pub product_name: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteProductRequest {
    pub pid: Option<i64>,
}

// ==================== Transaction Types ====================

/// Transaction body for both create and update
///
/// Dates are accepted as RFC 3339 or `YYYY-MM-DD`.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub tid: Option<i64>,
    pub transaction_date: Option<String>,
    #[serde(alias = "transactionProduct")]
    pub product: Option<i64>,
    pub transaction_count: Option<f64>,
    pub price: Option<f64>,
    pub actual_total: Option<f64>,
    pub handler1: Option<i64>,
    pub handler2: Option<i64>,
    pub handler3: Option<i64>,
    pub remarks: Option<String>,
}

impl TransactionRequest {
    /// Names of required creation fields that are absent
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.transaction_date.as_deref().is_none_or(str::is_empty) {
            missing.push("transactionDate");
        }
        if self.product.is_none() {
            missing.push("product");
        }
        if self.transaction_count.is_none() {
            missing.push("transactionCount");
        }
        if self.price.is_none() {
            missing.push("price");
        }
        if self.actual_total.is_none() {
            missing.push("actualTotal");
        }
        if self.handler1.is_none() {
            missing.push("handler1");
        }
        missing
    }
}

#[derive(Deserialize)]
pub struct DeleteTransactionRequest {
    pub tid: Option<i64>,
}
