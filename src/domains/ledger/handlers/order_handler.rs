use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::domains::ledger::models::{Order, OrderSubmission};
use crate::shared::errors::LedgerError;
use crate::shared::middleware::auth::AuthenticatedUser;
use crate::shared::services::AppState;

/// 주문 번호 등록
/// Upload an order number (plain text body)
#[utoipa::path(
    post,
    path = "/api/user/orders",
    request_body(content = String, content_type = "text/plain", description = "Order number"),
    responses(
        (status = 202, description = "New order accepted for processing"),
        (status = 200, description = "Order was already uploaded by this user"),
        (status = 400, description = "Malformed order number"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Order was uploaded by another user"),
        (status = 422, description = "Order number failed the Luhn check"),
        (status = 500, description = "Internal server error")
    ),
    security(("BearerAuth" = [])),
    tag = "Orders"
)]
pub async fn submit_order(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    body: String,
) -> Result<StatusCode, (StatusCode, Json<serde_json::Value>)> {
    let submission = app_state
        .ledger_state
        .ledger_service
        .submit_order(user.user_id, &body)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(match submission {
        OrderSubmission::Accepted => StatusCode::ACCEPTED,
        OrderSubmission::AlreadyUploaded => StatusCode::OK,
    })
}

/// 주문 목록 조회
/// List the user's orders, oldest first
#[utoipa::path(
    get,
    path = "/api/user/orders",
    responses(
        (status = 200, description = "Orders", body = Vec<Order>),
        (status = 204, description = "No orders uploaded yet"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("BearerAuth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let orders = app_state
        .ledger_state
        .ledger_service
        .list_orders(user.user_id)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    if orders.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(orders).into_response())
}
