//! Role policy

use crate::jwt::Claims;

/// Role required by a mutating operation.
///
/// Reads need no role, only a valid token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredRole {
    /// User management
    AdminOnly,
    /// Product and transaction mutation
    AdminOrHandler,
}

impl RequiredRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredRole::AdminOnly => "admin",
            RequiredRole::AdminOrHandler => "admin-or-handler",
        }
    }
}

/// Whether `claims` satisfy `required`
pub fn authorize(claims: &Claims, required: RequiredRole) -> bool {
    match required {
        RequiredRole::AdminOnly => claims.is_admin,
        RequiredRole::AdminOrHandler => claims.is_admin || claims.is_handler,
    }
}
