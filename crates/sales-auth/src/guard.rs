//! Authorization guard
//!
//! A request moves through
//! `Unauthenticated -> TokenValidated -> ClaimsExtracted -> Authorized`,
//! and any failed step short-circuits with the matching [`AuthError`].
//! Tokens are trusted on signature and expiry alone; the store is
//! never consulted.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::AuthError;
use crate::jwt::{Claims, JwtManager};
use crate::policy::{RequiredRole, authorize};

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    let (scheme, token) = header.split_once(' ').ok_or(AuthError::InvalidToken)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidToken);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidToken);
    }
    Ok(token)
}

/// Run the full guard for one request.
///
/// `header` is the raw `Authorization` header value, if any. With
/// `required` unset only authentication is performed.
pub fn authorize_request(
    header: Option<&str>,
    jwt: &JwtManager,
    required: Option<RequiredRole>,
    now: DateTime<Utc>,
) -> Result<Claims, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;
    let token = extract_bearer_token(header)?;
    let claims = jwt.validate_token_at(token, now)?;

    if let Some(role) = required
        && !authorize(&claims, role)
    {
        info!("User with UID {} denied: requires {}", claims.uid, role.as_str());
        return Err(AuthError::Forbidden);
    }

    Ok(claims)
}
