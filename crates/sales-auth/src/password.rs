//! Password hashing
//!
//! Passwords are first pre-hashed with HMAC-SHA256 keyed by the server
//! secret and base64-encoded, then stored with bcrypt. The pre-hash keeps
//! every bcrypt input at 44 bytes, well under bcrypt's 72-byte limit, and
//! makes a leaked hash useless without the secret.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AuthError;
use crate::secret::Secret;

type HmacSha256 = Hmac<Sha256>;

/// bcrypt cost factor used unless configured otherwise.
pub const DEFAULT_COST: u32 = 10;

/// Keyed pre-hash of a password: base64(HMAC-SHA256(secret, password)).
pub fn pre_hash(secret: &[u8], password: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(password.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Secret-bound bcrypt hasher
#[derive(Clone, Debug)]
pub struct PasswordHasher {
    secret: Secret,
    cost: u32,
}

impl PasswordHasher {
    pub fn new(secret: Secret, cost: u32) -> Self {
        Self { secret, cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password for storage
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let prehashed = pre_hash(self.secret.expose(), password);
        Ok(bcrypt::hash(prehashed, self.cost)?)
    }

    /// Verify a password against a stored hash in constant time
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let prehashed = pre_hash(self.secret.expose(), password);
        Ok(bcrypt::verify(prehashed, hash)?)
    }

    /// [`hash`](Self::hash) on the blocking thread pool
    pub async fn hash_blocking(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Task(e.to_string()))?
    }

    /// [`verify`](Self::verify) on the blocking thread pool
    pub async fn verify_blocking(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Task(e.to_string()))?
    }
}
