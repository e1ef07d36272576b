//! Sales Tracker Database Layer
//!
//! This crate provides the persistence store for Sales Tracker:
//! users (credentials and role flags), products and sales transactions,
//! kept in SQLite via sqlx.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::Database;
