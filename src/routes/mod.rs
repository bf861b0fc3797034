// Routes module: 라우팅 설정
// 역할: 모든 도메인의 라우터를 조합
// Routes module: combines all domain routers

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::shared::services::AppState;

use crate::domains::auth::routes::create_auth_router;
use crate::domains::ledger::routes::create_ledger_router;

/// Create main router (combines all domain routers)
/// 메인 라우터 생성 (모든 도메인 라우터 조합)
pub fn create_router() -> Router<AppState> {
    Router::new().nest(
        "/api/user",
        Router::new()
            .merge(create_auth_router())
            .merge(create_ledger_router()),
    )
}

/// 상태와 공통 레이어(요청 trace, CORS)를 붙인 애플리케이션
/// Application router with state and the shared layers attached
pub fn create_app(app_state: AppState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
