//! First-run administrator bootstrap

use anyhow::Result;
use sales_auth::PasswordHasher;
use sales_db::{Database, NewUser};
use tracing::{info, warn};

use crate::config::AuthConfig;

/// Create an administrator+handler account when no users exist.
///
/// Returns whether an account was created.
pub async fn bootstrap_admin(db: &Database, hasher: &PasswordHasher, auth: &AuthConfig) -> Result<bool> {
    if !auth.bootstrap_admin || db.has_users().await? {
        return Ok(false);
    }

    info!("Creating default admin user");
    let password_hash = hasher.hash_blocking(auth.bootstrap_password.clone()).await?;
    let user = db
        .insert_user(NewUser {
            username: auth.bootstrap_username.clone(),
            password_hash,
            is_admin: true,
            is_handler: true,
        })
        .await?;

    warn!(
        "Default admin user {} created (UID {}); change its password",
        user.username, user.uid
    );
    Ok(true)
}
