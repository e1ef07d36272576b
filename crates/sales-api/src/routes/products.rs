//! Product routes

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use sales_db::{DbError, Product};
use tracing::info;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::state::AppState;

use super::JsonBody;
use super::auth::{RequireAdminOrHandler, RequireAuth};
use super::types::{CreateProductRequest, DeleteProductRequest, UpdateProductRequest};

fn name_conflict(e: DbError) -> ApiError {
    match e {
        DbError::Duplicate(_) => {
            ApiError::Conflict("Product with that name already exists".to_string())
        }
        other => other.into(),
    }
}

/// GET /products/get
async fn list_products(
    _user: RequireAuth,
    State(state): State<AppState>,
) -> Result<Envelope<Vec<Product>>, ApiError> {
    Ok(Envelope::ok(state.db.list_products().await?))
}

/// POST /products/create
async fn create_product(
    RequireAdminOrHandler(user): RequireAdminOrHandler,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateProductRequest>,
) -> Result<Envelope<Product>, ApiError> {
    let product_name = request
        .product_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Product name not provided".to_string()))?;

    let product = state
        .db
        .insert_product(&product_name)
        .await
        .map_err(name_conflict)?;

    info!(
        "User with UID {} created product {} (PID {})",
        user.uid, product.product_name, product.pid
    );
    Ok(Envelope::ok(product))
}

/// POST /products/update
async fn update_product(
    RequireAdminOrHandler(user): RequireAdminOrHandler,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateProductRequest>,
) -> Result<Envelope<Product>, ApiError> {
    let pid = request
        .pid
        .ok_or_else(|| ApiError::BadRequest("Product ID not provided".to_string()))?;

    if let Some(name) = request.product_name.filter(|name| !name.trim().is_empty())
        && state.db.rename_product(pid, &name).await.map_err(name_conflict)?
    {
        info!("User with UID {} renamed PID {} to {}", user.uid, pid, name);
    }

    let product = state
        .db
        .get_product(pid)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product does not exist".to_string()))?;

    Ok(Envelope::ok(product))
}

/// POST /products/delete
async fn delete_product(
    RequireAdminOrHandler(user): RequireAdminOrHandler,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<DeleteProductRequest>,
) -> Result<Envelope, ApiError> {
    let pid = request
        .pid
        .ok_or_else(|| ApiError::BadRequest("Product ID not provided".to_string()))?;

    let deleted = state.db.delete_product(pid).await.map_err(|e| match e {
        DbError::Constraint(_) => {
            ApiError::Conflict("Product is referenced by existing transactions".to_string())
        }
        other => other.into(),
    })?;
    if !deleted {
        return Err(ApiError::NotFound("Product does not exist".to_string()));
    }

    info!("User with UID {} deleted PID {}", user.uid, pid);
    Ok(Envelope::empty())
}

/// Create product routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products/get", get(list_products))
        .route("/products/create", post(create_product))
        .route("/products/update", post(update_product))
        .route("/products/delete", post(delete_product))
}
