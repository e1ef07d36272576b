//! Sales Tracker Authentication and Authorization
//!
//! This crate provides password pre-hashing and bcrypt storage, login,
//! JWT issuance/validation and role-based access control for Sales Tracker.
//! Nothing here depends on a web framework: the HTTP layer adapts
//! [`authorize_request`] into its own extractors.

pub mod authenticator;
pub mod error;
pub mod guard;
pub mod jwt;
pub mod password;
pub mod policy;
pub mod secret;

pub use authenticator::{Authenticator, IssuedToken};
pub use error::AuthError;
pub use guard::{authorize_request, extract_bearer_token};
pub use jwt::{Claims, DEFAULT_TOKEN_TTL_SECS, JwtManager};
pub use password::{DEFAULT_COST, PasswordHasher, pre_hash};
pub use policy::{RequiredRole, authorize};
pub use secret::Secret;
