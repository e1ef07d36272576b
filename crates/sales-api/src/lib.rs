//! Sales Tracker REST API
//!
//! This crate provides the Axum-based HTTP API for Sales Tracker:
//! login and token verification, plus user, product and transaction
//! management. Every response uses the JSON envelope in [`envelope`].

pub mod envelope;
pub mod error;
pub mod routes;
pub mod state;

pub use envelope::Envelope;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
