//! API routes

pub mod auth;
mod products;
mod transactions;
pub mod types;
mod users;

use axum::{Router, extract::FromRequest, http::StatusCode};
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::state::AppState;

/// JSON body extractor whose rejections render as the error envelope
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

async fn not_found() -> Envelope {
    Envelope::error(StatusCode::NOT_FOUND, None)
}

/// Create the main router
///
/// With a `static_dir`, unmatched paths are served from it and fall back
/// to its `index.html` so the frontend can route client-side.
pub fn create_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .merge(auth::routes())
        .merge(users::routes())
        .merge(products::routes())
        .merge(transactions::routes())
        .with_state(state);

    match static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => router.fallback(not_found),
    }
}
