//! API error types

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sales_auth::AuthError;
use sales_db::DbError;
use thiserror::Error;
use tracing::error;

use crate::envelope::Envelope;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

fn auth_status(e: &AuthError) -> StatusCode {
    match e {
        AuthError::MissingField(_) => StatusCode::BAD_REQUEST,
        AuthError::InvalidCredentials
        | AuthError::MissingToken
        | AuthError::InvalidToken
        | AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
        AuthError::Forbidden => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, Some(msg)),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, Some(msg)),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, Some(msg)),
            ApiError::Auth(e) if !e.is_internal() => (auth_status(&e), Some(e.to_string())),
            ApiError::Database(DbError::Duplicate(_)) => {
                (StatusCode::CONFLICT, Some("Duplicate entry".to_string()))
            }
            ApiError::Database(DbError::Constraint(_)) => (
                StatusCode::CONFLICT,
                Some("Referenced record conflict".to_string()),
            ),
            // Internal detail goes to the log, never to the client
            internal => {
                error!("{}", internal);
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
        };

        Envelope::error(status, message).into_response()
    }
}
