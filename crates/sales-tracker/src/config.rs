//! Configuration loading
//!
//! Values come from an optional TOML file, then `SALES_TRACKER__*`
//! environment variables (`__` separates nested keys, e.g.
//! `SALES_TRACKER__AUTH__KEY_PATH`).

use anyhow::{Context, Result, bail};
use config::{Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub tls: TlsConfig,
    pub logging: LoggingConfig,
    /// File the values were read from, if it existed
    #[serde(skip)]
    pub source: Option<String>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Built frontend to serve for unmatched paths
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: None,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "./data/sales-tracker.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// File holding the signing/pre-hash secret, used verbatim
    pub key_path: String,
    pub bcrypt_cost: u32,
    pub token_ttl_secs: i64,
    /// Create an administrator when the user table is empty
    pub bootstrap_admin: bool,
    pub bootstrap_username: String,
    pub bootstrap_password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            key_path: "./secrets/auth.key".to_string(),
            bcrypt_cost: sales_auth::DEFAULT_COST,
            token_ttl_secs: sales_auth::DEFAULT_TOKEN_TTL_SECS,
            bootstrap_admin: true,
            bootstrap_username: "admin".to_string(),
            bootstrap_password: "admin".to_string(),
        }
    }
}

/// TLS configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Enable the HTTPS listener
    pub enabled: bool,
    pub port: u16,
    /// Path to TLS certificate file (PEM format)
    pub cert_path: Option<String>,
    /// Path to TLS private key file (PEM format)
    pub key_path: Option<String>,
    /// Answer plain HTTP with a redirect to the HTTPS port (default: on)
    pub redirect_http: Option<bool>,
}

impl TlsConfig {
    /// Whether the HTTP listener should only redirect to HTTPS
    pub fn redirects_http(&self) -> bool {
        self.enabled && self.redirect_http.unwrap_or(true)
    }
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 8443,
            cert_path: None,
            key_path: None,
            redirect_http: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    /// Append log lines to this file instead of stdout
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file (if present) and the environment
    pub fn load(path: &str) -> Result<Self> {
        let mut config: Config = config::Config::builder()
            .add_source(File::new(path, FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix("SALES_TRACKER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path))?
            .try_deserialize()
            .with_context(|| format!("Failed to parse configuration from {}", path))?;

        config.validate()?;
        config.source = Path::new(path).exists().then(|| path.to_string());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            bail!(
                "auth.bcrypt_cost must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            );
        }
        if self.auth.token_ttl_secs <= 0 {
            bail!("auth.token_ttl_secs must be positive");
        }
        if self.tls.enabled && (self.tls.cert_path.is_none() || self.tls.key_path.is_none()) {
            bail!("tls.cert_path and tls.key_path are required when TLS is enabled");
        }
        Ok(())
    }
}
