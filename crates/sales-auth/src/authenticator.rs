//! Credential verification and token issuance

use std::sync::Arc;

use sales_db::Database;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::AuthError;
use crate::jwt::JwtManager;
use crate::password::PasswordHasher;

/// Outcome of a successful login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Verifies username/password pairs against the user store
pub struct Authenticator {
    db: Database,
    hasher: PasswordHasher,
    jwt: Arc<JwtManager>,
    /// Verified against when the username is unknown, so that a miss
    /// costs the same bcrypt work as a wrong password.
    dummy_hash: String,
}

impl Authenticator {
    pub fn new(db: Database, hasher: PasswordHasher, jwt: Arc<JwtManager>) -> Result<Self, AuthError> {
        let dummy_hash = hasher.hash("timing-equalizer")?;
        Ok(Self {
            db,
            hasher,
            jwt,
            dummy_hash,
        })
    }

    /// Log a user in.
    ///
    /// Username is checked for presence before password. Unknown users
    /// and wrong passwords both yield [`AuthError::InvalidCredentials`].
    pub async fn login(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<IssuedToken, AuthError> {
        let username = username
            .filter(|u| !u.is_empty())
            .ok_or(AuthError::MissingField("Username"))?;
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or(AuthError::MissingField("Password"))?;

        debug!("Login attempt for user: {}", username);

        let user = self.db.get_user_by_username(username).await?;

        let hash_to_verify = match &user {
            Some(u) => u.password_hash.clone(),
            None => self.dummy_hash.clone(),
        };
        let password_valid = self
            .hasher
            .verify_blocking(password.to_string(), hash_to_verify)
            .await?;

        let user = match (user, password_valid) {
            (Some(u), true) => u,
            _ => {
                info!("Login attempt for user {} failed", username);
                return Err(AuthError::InvalidCredentials);
            }
        };

        let token = self
            .jwt
            .generate_token(user.uid, user.is_admin, user.is_handler)?;

        info!("User with UID {} logged in successfully", user.uid);

        Ok(IssuedToken {
            token,
            expires_in: self.jwt.token_ttl().num_seconds(),
        })
    }
}
