// Simulator routes
use axum::{routing::get, Router};

use crate::domains::simulator::handlers::{get_order_verdict, SimulatorState};

/// Create accrual simulator router
/// 시뮬레이터 라우터 생성
///
/// throttle_percent: 요청이 429로 거절될 확률 (0-100)
pub fn create_simulator_router(throttle_percent: u8) -> Router {
    Router::new()
        .route("/api/orders/:number", get(get_order_verdict))
        .with_state(SimulatorState {
            throttle_percent: throttle_percent.min(100),
        })
}
