use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domains::ledger::models::{Balance, WithdrawRequest, Withdrawal};
use crate::shared::errors::LedgerError;
use crate::shared::middleware::auth::AuthenticatedUser;
use crate::shared::services::AppState;

type ApiError = (StatusCode, Json<serde_json::Value>);

/// 잔고 조회
/// Get the user's points balance
#[utoipa::path(
    get,
    path = "/api/user/balance",
    responses(
        (status = 200, description = "Current balance", body = Balance),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("BearerAuth" = [])),
    tag = "Balance"
)]
pub async fn get_balance(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Balance>, ApiError> {
    let balance = app_state
        .ledger_state
        .ledger_service
        .get_balance(user.user_id)
        .await
        .map_err(|e: LedgerError| -> ApiError { e.into() })?;

    Ok(Json(balance))
}

/// 포인트 출금
/// Withdraw points against an order number
#[utoipa::path(
    post,
    path = "/api/user/balance/withdraw",
    request_body = WithdrawRequest,
    responses(
        (status = 200, description = "Withdrawal recorded"),
        (status = 400, description = "Malformed request or non-positive sum"),
        (status = 401, description = "Unauthorized"),
        (status = 402, description = "Insufficient balance"),
        (status = 422, description = "Invalid order number"),
        (status = 500, description = "Internal server error")
    ),
    security(("BearerAuth" = [])),
    tag = "Balance"
)]
pub async fn withdraw(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    request: Result<Json<WithdrawRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = request.map_err(|rejection| -> ApiError {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("Malformed request: {}", rejection.body_text()) })),
        )
    })?;

    app_state
        .ledger_state
        .ledger_service
        .withdraw(user.user_id, request)
        .await
        .map_err(|e: LedgerError| -> ApiError { e.into() })?;

    Ok(StatusCode::OK)
}

/// 출금 내역 조회
/// List the user's withdrawals, oldest first
#[utoipa::path(
    get,
    path = "/api/user/withdrawals",
    responses(
        (status = 200, description = "Withdrawals", body = Vec<Withdrawal>),
        (status = 204, description = "No withdrawals yet"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("BearerAuth" = [])),
    tag = "Balance"
)]
pub async fn list_withdrawals(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Response, ApiError> {
    let withdrawals = app_state
        .ledger_state
        .ledger_service
        .list_withdrawals(user.user_id)
        .await
        .map_err(|e: LedgerError| -> ApiError { e.into() })?;

    if withdrawals.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(withdrawals).into_response())
}
