use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    Json,
};
use serde_json::json;

use crate::domains::ledger::models::UserId;
use crate::shared::services::AppState;

/// 인증된 사용자 정보 (JWT 토큰에서 추출)
/// Authenticated user information (extracted from JWT token)
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub login: String,
}

/// AuthenticatedUser를 Axum Extractor로 구현
///
/// 핸들러 인자에 `user: AuthenticatedUser`를 넣으면
/// `Authorization: Bearer <token>` 검증에 실패한 요청은 401로 거절됩니다.
#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let unauthorized = |message: &str| {
            (StatusCode::UNAUTHORIZED, Json(json!({ "error": message })))
        };

        // 1. Authorization 헤더에서 토큰 추출
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| unauthorized("Missing authorization header"))?
            .to_str()
            .map_err(|_| unauthorized("Invalid authorization header"))?;

        // 2. "Bearer <token>" 형식 파싱
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid authorization format. Expected: 'Bearer <token>'"))?;

        // 3. 토큰 검증
        let claims = state
            .auth_state
            .jwt_service
            .verify_access_token(token.trim())
            .map_err(|e| unauthorized(&e.to_string()))?;

        Ok(AuthenticatedUser {
            user_id: claims.user_id,
            login: claims.login,
        })
    }
}
