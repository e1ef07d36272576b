//! Application state

use sales_auth::{Authenticator, JwtManager, PasswordHasher};
use sales_db::Database;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub hasher: PasswordHasher,
    pub authenticator: Arc<Authenticator>,
}

impl AppState {
    pub fn new(
        db: Database,
        jwt: Arc<JwtManager>,
        hasher: PasswordHasher,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        Self {
            db,
            jwt,
            hasher,
            authenticator,
        }
    }
}
