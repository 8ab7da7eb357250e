use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::dto::MessageResponse;
use crate::auth::extractors::CurrentUser;
use crate::banks::repo as banks_repo;
use crate::error::ApiError;
use crate::state::AppState;
use crate::transactions::analytics::{month_bounds, monthly_summary, MonthlySummary};
use crate::transactions::dto::{
    ListQuery, MonthlyQuery, TransactionListResponse, TransactionPayload, TransactionResponse,
};
use crate::transactions::export::to_csv;
use crate::transactions::repo;

pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route(
            "/transactions/:id",
            put(update_transaction).delete(delete_transaction),
        )
        .route("/transactions/analytics/monthly", get(monthly_analytics))
        .route("/transactions/export", get(export_transactions))
}

#[instrument(skip(state, current_user, query))]
pub async fn list_transactions(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<TransactionListResponse>, ApiError> {
    let filter = query.validate()?;

    let total = repo::count_filtered(&state.db, current_user.id, &filter).await?;
    let transactions = repo::list_filtered(&state.db, current_user.id, &filter).await?;

    Ok(Json(TransactionListResponse {
        transactions,
        total,
        page: filter.page,
        pages: (total + filter.limit - 1) / filter.limit,
    }))
}

#[instrument(skip(state, current_user, payload))]
pub async fn create_transaction(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(payload): Json<TransactionPayload>,
) -> Result<(StatusCode, Json<TransactionResponse>), ApiError> {
    let new_transaction = payload.validate()?;
    ensure_bank_owned(&state, new_transaction.bank_id, &current_user).await?;

    let transaction = repo::insert(&state.db, current_user.id, &new_transaction).await?;
    info!(
        user_id = %current_user.id,
        transaction_id = %transaction.id,
        "transaction created"
    );
    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse { transaction }),
    ))
}

#[instrument(skip(state, current_user, payload))]
pub async fn update_transaction(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionPayload>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let new_transaction = payload.validate()?;
    ensure_bank_owned(&state, new_transaction.bank_id, &current_user).await?;

    let transaction = repo::update_owned(&state.db, id, current_user.id, &new_transaction)
        .await?
        .ok_or(ApiError::NotFound("Transaction"))?;

    info!(
        user_id = %current_user.id,
        transaction_id = %transaction.id,
        "transaction updated"
    );
    Ok(Json(TransactionResponse { transaction }))
}

#[instrument(skip(state, current_user))]
pub async fn delete_transaction(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !repo::delete_owned(&state.db, id, current_user.id).await? {
        return Err(ApiError::NotFound("Transaction"));
    }

    info!(user_id = %current_user.id, transaction_id = %id, "transaction deleted");
    Ok(Json(MessageResponse {
        message: "Transaction deleted",
    }))
}

#[instrument(skip(state, current_user, query))]
pub async fn monthly_analytics(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<MonthlyQuery>,
) -> Result<Json<MonthlySummary>, ApiError> {
    let (month, year) = query.validate()?;
    let (from, to) = month_bounds(year, month)
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("invalid month bounds")))?;

    let transactions = repo::list_in_window(&state.db, current_user.id, from, to).await?;
    Ok(Json(monthly_summary(&transactions)))
}

#[instrument(skip(state, current_user))]
pub async fn export_transactions(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Response, ApiError> {
    let transactions = repo::list_for_export(&state.db, current_user.id).await?;
    let csv = to_csv(&transactions)?;

    info!(
        user_id = %current_user.id,
        rows = transactions.len(),
        "transactions exported"
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=transactions.csv",
            ),
        ],
        csv,
    )
        .into_response())
}

/// The referenced bank must belong to the caller; a foreign or unknown bank
/// reads as absent so existence is not leaked across users.
async fn ensure_bank_owned(
    state: &AppState,
    bank_id: Uuid,
    current_user: &CurrentUser,
) -> Result<(), ApiError> {
    if banks_repo::exists_owned(&state.db, bank_id, current_user.id).await? {
        Ok(())
    } else {
        warn!(user_id = %current_user.id, bank_id = %bank_id, "bank not owned by caller");
        Err(ApiError::NotFound("Bank"))
    }
}
