//! Server secret

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::error::AuthError;

/// Shared key used both for password pre-hashing and token signing.
///
/// Loaded once at startup and immutable afterwards. Cloning is cheap.
#[derive(Clone)]
pub struct Secret(Arc<[u8]>);

impl Secret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Arc::from(bytes.into()))
    }

    /// Read the secret from a key file.
    ///
    /// The file content is used verbatim (no trimming) so that hashes
    /// created by earlier deployments with the same key file stay valid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| AuthError::SecretRead {
            path: path.display().to_string(),
            source,
        })?;

        if bytes.is_empty() {
            return Err(AuthError::EmptySecret(path.display().to_string()));
        }

        info!("Loaded auth secret from {}", path.display());
        Ok(Self::new(bytes))
    }

    pub fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}
