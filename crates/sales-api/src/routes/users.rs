//! User management routes

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use sales_db::{DbError, NewUser, UserChanges};
use tracing::info;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::state::AppState;

use super::JsonBody;
use super::auth::{RequireAdmin, RequireAuth};
use super::types::{CreateUserRequest, DeleteUserRequest, UpdateUserRequest, UserResponse};

fn username_conflict(e: DbError) -> ApiError {
    match e {
        DbError::Duplicate(_) => {
            ApiError::Conflict("User with that username already exists".to_string())
        }
        other => other.into(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ==================== User Routes ====================

/// GET /users/get
async fn list_users(
    _user: RequireAuth,
    State(state): State<AppState>,
) -> Result<Envelope<Vec<UserResponse>>, ApiError> {
    let users = state.db.list_users().await?;
    Ok(Envelope::ok(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /users/create
async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> Result<Envelope<UserResponse>, ApiError> {
    let username = non_empty(request.username)
        .ok_or_else(|| ApiError::BadRequest("Username not provided".to_string()))?;
    let password = non_empty(request.password)
        .ok_or_else(|| ApiError::BadRequest("Password not provided".to_string()))?;

    let password_hash = state.hasher.hash_blocking(password).await?;
    let user = state
        .db
        .insert_user(NewUser {
            username,
            password_hash,
            is_admin: request.is_admin.unwrap_or(false),
            is_handler: request.is_handler.unwrap_or(false),
        })
        .await
        .map_err(username_conflict)?;

    info!(
        "User with UID {} created user {} (UID {})",
        admin.uid, user.username, user.uid
    );
    if user.is_admin {
        info!("User with UID {} granted admin to UID {}", admin.uid, user.uid);
    }
    if user.is_handler {
        info!("User with UID {} granted handler to UID {}", admin.uid, user.uid);
    }

    Ok(Envelope::ok(user.into()))
}

/// POST /users/update
async fn update_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateUserRequest>,
) -> Result<Envelope<UserResponse>, ApiError> {
    let uid = request
        .uid
        .ok_or_else(|| ApiError::BadRequest("User ID not provided".to_string()))?;
    let existing = state
        .db
        .get_user_by_id(uid)
        .await?
        .ok_or_else(|| ApiError::NotFound("User does not exist".to_string()))?;

    let username = non_empty(request.username).filter(|u| *u != existing.username);
    let password = non_empty(request.password);
    let is_admin = request.is_admin.filter(|flag| *flag != existing.is_admin);
    let is_handler = request.is_handler.filter(|flag| *flag != existing.is_handler);

    // Hash before writing so the update is a single statement
    let password_hash = match password {
        Some(password) => Some(state.hasher.hash_blocking(password).await?),
        None => None,
    };
    let password_changed = password_hash.is_some();

    state
        .db
        .update_user(
            uid,
            UserChanges {
                username: username.clone(),
                password_hash,
                is_admin,
                is_handler,
            },
        )
        .await
        .map_err(username_conflict)?;

    if let Some(username) = &username {
        info!(
            "User with UID {} renamed UID {} from {} to {}",
            admin.uid, uid, existing.username, username
        );
    }
    if password_changed {
        info!("User with UID {} changed the password of UID {}", admin.uid, uid);
    }
    for (role, change) in [("admin", is_admin), ("handler", is_handler)] {
        if let Some(granted) = change {
            let action = if granted { "granted" } else { "revoked" };
            info!("User with UID {} {} {} for UID {}", admin.uid, action, role, uid);
        }
    }

    let updated = state
        .db
        .get_user_by_id(uid)
        .await?
        .ok_or_else(|| ApiError::NotFound("User does not exist".to_string()))?;

    Ok(Envelope::ok(updated.into()))
}

/// POST /users/delete
async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<DeleteUserRequest>,
) -> Result<Envelope, ApiError> {
    let uid = request
        .uid
        .ok_or_else(|| ApiError::BadRequest("User ID not provided".to_string()))?;

    let deleted = state.db.delete_user(uid).await.map_err(|e| match e {
        DbError::Constraint(_) => {
            ApiError::Conflict("User is referenced by existing transactions".to_string())
        }
        other => other.into(),
    })?;
    if !deleted {
        return Err(ApiError::NotFound("User does not exist".to_string()));
    }

    info!("User with UID {} deleted UID {}", admin.uid, uid);
    Ok(Envelope::empty())
}

/// Create user management routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/get", get(list_users))
        .route("/users/create", post(create_user))
        .route("/users/update", post(update_user))
        .route("/users/delete", post(delete_user))
}
