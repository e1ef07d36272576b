//! Sales transaction routes

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use sales_db::utils::parse_date_input;
use sales_db::{DbError, NewTransaction, Transaction, TransactionChanges};
use tracing::info;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::state::AppState;

use super::JsonBody;
use super::auth::{RequireAdminOrHandler, RequireAuth};
use super::types::{DeleteTransactionRequest, TransactionRequest};

fn parse_date(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    parse_date_input(raw)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid transaction date: {}", raw)))
}

fn reference_conflict(e: DbError) -> ApiError {
    match e {
        DbError::Constraint(_) => {
            ApiError::Conflict("Referenced product or handler does not exist".to_string())
        }
        other => other.into(),
    }
}

/// GET /transactions/get
async fn list_transactions(
    _user: RequireAuth,
    State(state): State<AppState>,
) -> Result<Envelope<Vec<Transaction>>, ApiError> {
    Ok(Envelope::ok(state.db.list_transactions().await?))
}

/// POST /transactions/create
async fn create_transaction(
    RequireAdminOrHandler(user): RequireAdminOrHandler,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<TransactionRequest>,
) -> Result<Envelope<Transaction>, ApiError> {
    let missing = request.missing_fields();
    let (
        Some(date),
        Some(product),
        Some(transaction_count),
        Some(price),
        Some(actual_total),
        Some(handler1),
    ) = (
        request.transaction_date.as_deref().filter(|d| !d.is_empty()),
        request.product,
        request.transaction_count,
        request.price,
        request.actual_total,
        request.handler1,
    )
    else {
        return Err(ApiError::BadRequest(format!(
            "Missing field(s): {}",
            missing.join(", ")
        )));
    };

    let transaction = state
        .db
        .insert_transaction(NewTransaction {
            transaction_date: parse_date(date)?,
            product,
            transaction_count,
            price,
            actual_total,
            handler1,
            handler2: request.handler2,
            handler3: request.handler3,
            remarks: request.remarks.filter(|r| !r.is_empty()),
        })
        .await
        .map_err(reference_conflict)?;

    info!("User with UID {} created TID {}", user.uid, transaction.tid);
    Ok(Envelope::ok(transaction))
}

/// POST /transactions/update
async fn update_transaction(
    RequireAdminOrHandler(user): RequireAdminOrHandler,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<TransactionRequest>,
) -> Result<Envelope<Transaction>, ApiError> {
    let tid = request
        .tid
        .ok_or_else(|| ApiError::BadRequest("Transaction ID not provided".to_string()))?;

    let transaction_date = request
        .transaction_date
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(parse_date)
        .transpose()?;

    let changes = TransactionChanges {
        transaction_date,
        product: request.product,
        transaction_count: request.transaction_count,
        price: request.price,
        actual_total: request.actual_total,
        handler1: request.handler1,
        handler2: request.handler2,
        handler3: request.handler3,
        remarks: request.remarks,
    };

    let updated = state
        .db
        .update_transaction(tid, changes)
        .await
        .map_err(reference_conflict)?;
    if !updated {
        return Err(ApiError::NotFound("Transaction does not exist".to_string()));
    }

    let transaction = state
        .db
        .get_transaction(tid)
        .await?
        .ok_or_else(|| ApiError::NotFound("Transaction does not exist".to_string()))?;

    info!("User with UID {} updated TID {}", user.uid, tid);
    Ok(Envelope::ok(transaction))
}

/// POST /transactions/delete
async fn delete_transaction(
    RequireAdminOrHandler(user): RequireAdminOrHandler,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<DeleteTransactionRequest>,
) -> Result<Envelope, ApiError> {
    let tid = request
        .tid
        .ok_or_else(|| ApiError::BadRequest("Transaction ID not provided".to_string()))?;

    if !state.db.delete_transaction(tid).await? {
        return Err(ApiError::NotFound("Transaction does not exist".to_string()));
    }

    info!("User with UID {} deleted TID {}", user.uid, tid);
    Ok(Envelope::empty())
}

/// Create transaction routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions/get", get(list_transactions))
        .route("/transactions/create", post(create_transaction))
        .route("/transactions/update", post(update_transaction))
        .route("/transactions/delete", post(delete_transaction))
}
