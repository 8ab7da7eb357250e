use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::dto::MessageResponse;
use crate::auth::extractors::CurrentUser;
use crate::banks::dto::{AnnotatedBank, BankListResponse, BankPayload, BankResponse};
use crate::banks::repo;
use crate::error::ApiError;
use crate::state::AppState;
use crate::transactions::analytics::{account_totals, AccountTotals};
use crate::transactions::repo as transactions_repo;

pub fn bank_routes() -> Router<AppState> {
    Router::new()
        .route("/banks", get(list_banks).post(create_bank))
        .route("/banks/:id", put(update_bank).delete(delete_bank))
}

#[instrument(skip(state, current_user))]
pub async fn list_banks(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<BankListResponse>, ApiError> {
    let banks = repo::list_by_user(&state.db, current_user.id).await?;
    // One pass over the user's transaction log annotates every account.
    let transactions = transactions_repo::list_by_user(&state.db, current_user.id).await?;

    let banks = banks
        .into_iter()
        .map(|bank| {
            let totals = account_totals(&bank, &transactions);
            AnnotatedBank::new(bank, totals)
        })
        .collect();

    Ok(Json(BankListResponse { banks }))
}

#[instrument(skip(state, current_user, payload))]
pub async fn create_bank(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(payload): Json<BankPayload>,
) -> Result<(StatusCode, Json<BankResponse>), ApiError> {
    let new_bank = payload.validate()?;
    let bank = repo::insert(&state.db, current_user.id, &new_bank).await?;

    info!(user_id = %current_user.id, bank_id = %bank.id, "bank account created");
    // A fresh account has no transactions; its balance is the initial one.
    let totals = AccountTotals {
        current_balance: bank.initial_balance,
        total_income: 0.0,
        total_expense: 0.0,
    };
    Ok((
        StatusCode::CREATED,
        Json(BankResponse {
            bank: AnnotatedBank::new(bank, totals),
        }),
    ))
}

#[instrument(skip(state, current_user, payload))]
pub async fn update_bank(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<BankPayload>,
) -> Result<Json<BankResponse>, ApiError> {
    let new_bank = payload.validate()?;
    let bank = repo::update_owned(&state.db, id, current_user.id, &new_bank)
        .await?
        .ok_or(ApiError::NotFound("Bank"))?;

    let transactions = transactions_repo::list_by_bank(&state.db, bank.id).await?;
    let totals = account_totals(&bank, &transactions);

    info!(user_id = %current_user.id, bank_id = %bank.id, "bank account updated");
    Ok(Json(BankResponse {
        bank: AnnotatedBank::new(bank, totals),
    }))
}

#[instrument(skip(state, current_user))]
pub async fn delete_bank(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let cascaded = repo::delete_owned_cascading(&state.db, id, current_user.id)
        .await?
        .ok_or(ApiError::NotFound("Bank"))?;

    info!(
        user_id = %current_user.id,
        bank_id = %id,
        cascaded_transactions = cascaded,
        "bank account deleted"
    );
    Ok(Json(MessageResponse {
        message: "Bank deleted successfully",
    }))
}
