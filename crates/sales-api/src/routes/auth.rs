//! Authentication extractors and routes

use axum::{
    Router,
    extract::{FromRef, FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
};
use chrono::Utc;
use sales_auth::{Claims, IssuedToken, RequiredRole, authorize_request};
use tracing::debug;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::state::AppState;

use super::JsonBody;
use super::types::LoginRequest;

// ==================== Auth Extractors ====================

/// Run the guard against the request's `Authorization` header
fn guard(parts: &Parts, state: &AppState, required: Option<RequiredRole>) -> Result<Claims, ApiError> {
    // A header that is not valid UTF-8 cannot carry a bearer token
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .map(|h| h.to_str().unwrap_or_default());

    let claims = authorize_request(header, &state.jwt, required, Utc::now())?;
    debug!("Authenticated UID {} for {}", claims.uid, parts.uri.path());
    Ok(claims)
}

/// Extractor for any authenticated user
pub struct RequireAuth(pub Claims);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        guard(parts, &app_state, None).map(RequireAuth)
    }
}

/// Extractor for administrators
pub struct RequireAdmin(pub Claims);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        guard(parts, &app_state, Some(RequiredRole::AdminOnly)).map(RequireAdmin)
    }
}

/// Extractor for administrators and handlers
pub struct RequireAdminOrHandler(pub Claims);

impl<S> FromRequestParts<S> for RequireAdminOrHandler
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        guard(parts, &app_state, Some(RequiredRole::AdminOrHandler)).map(RequireAdminOrHandler)
    }
}

// ==================== Auth Routes ====================

/// POST /login
async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Envelope<IssuedToken>, ApiError> {
    let issued = state
        .authenticator
        .login(request.username.as_deref(), request.password.as_deref())
        .await?;

    Ok(Envelope::ok(issued))
}

/// GET /verify
async fn verify(_user: RequireAuth) -> Envelope {
    Envelope::empty()
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/verify", get(verify))
}
