use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domains::auth::models::{Credentials, TokenResponse};
use crate::shared::errors::AuthError;
use crate::shared::services::AppState;

type ApiError = (StatusCode, Json<serde_json::Value>);

/// 토큰을 본문과 Authorization 헤더에 함께 담아 응답
fn token_response(token: String) -> Result<Response, ApiError> {
    let header = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| -> ApiError { AuthError::Internal(format!("Invalid token header: {}", e)).into() })?;

    let mut response = Json(TokenResponse { token }).into_response();
    response.headers_mut().insert(AUTHORIZATION, header);
    Ok(response)
}

fn bad_request(rejection: JsonRejection) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": format!("Malformed request: {}", rejection.body_text()) })),
    )
}

// 회원가입 핸들러
#[utoipa::path(
    post,
    path = "/api/user/register",
    request_body = Credentials,
    responses(
        (status = 200, description = "User registered and authenticated", body = TokenResponse),
        (status = 400, description = "Malformed request"),
        (status = 409, description = "Login already taken"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(app_state): State<AppState>,
    request: Result<Json<Credentials>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = request.map_err(bad_request)?;

    let token = app_state
        .auth_state
        .auth_service
        .register(request)
        .await
        .map_err(|e: AuthError| -> ApiError { e.into() })?;

    token_response(token)
}

// 로그인 핸들러
#[utoipa::path(
    post,
    path = "/api/user/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Malformed request"),
        (status = 401, description = "Invalid login or password"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(app_state): State<AppState>,
    request: Result<Json<Credentials>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = request.map_err(bad_request)?;

    let token = app_state
        .auth_state
        .auth_service
        .login(request)
        .await
        .map_err(|e: AuthError| -> ApiError { e.into() })?;

    token_response(token)
}
