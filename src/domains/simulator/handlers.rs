use axum::{
    extract::{Path, State},
    http::{header::RETRY_AFTER, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::domains::reconciliation::models::AccrualStatus;
use crate::shared::utils::is_valid_luhn;

/// 429 응답 시 Retry-After (초)
pub const SIMULATOR_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Clone, Copy)]
pub struct SimulatorState {
    pub throttle_percent: u8,
}

// 판정 응답 본문
#[derive(Debug, Serialize)]
struct VerdictResponse {
    order: String,
    status: AccrualStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    accrual: Option<f64>,
}

/// 무작위 판정 결과
#[derive(Debug, Clone, Copy, PartialEq)]
enum Outcome {
    Throttled,
    Verdict(AccrualStatus),
}

// 난수 생성은 await 없이 끝나야 하므로 별도 함수로 분리
fn roll(throttle_percent: u8) -> Outcome {
    let mut rng = rand::thread_rng();
    if rng.gen_range(0..100u8) < throttle_percent {
        return Outcome::Throttled;
    }
    if rng.gen_bool(0.5) {
        return Outcome::Verdict(AccrualStatus::Processed);
    }
    match rng.gen_range(0..3) {
        0 => Outcome::Verdict(AccrualStatus::Registered),
        1 => Outcome::Verdict(AccrualStatus::Processing),
        _ => Outcome::Verdict(AccrualStatus::Invalid),
    }
}

/// 주문 번호에서 결정적인 적립 포인트 계산 (0.00 ~ 358.99)
/// Deterministic accrual derived from the order number
fn accrual_for(number: &str) -> f64 {
    let cents = number
        .bytes()
        .fold(0u64, |acc, b| (acc * 10 + u64::from(b - b'0')) % 35_900);
    cents as f64 / 100.0
}

/// 주문 판정 조회
/// GET /api/orders/:number
pub async fn get_order_verdict(
    State(state): State<SimulatorState>,
    Path(number): Path<String>,
) -> Response {
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return (StatusCode::BAD_REQUEST, "order number must be numeric").into_response();
    }
    if !is_valid_luhn(&number) {
        return (StatusCode::UNPROCESSABLE_ENTITY, "invalid order number").into_response();
    }

    match roll(state.throttle_percent) {
        Outcome::Throttled => {
            debug!("Throttling request for order {}", number);
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(RETRY_AFTER, SIMULATOR_RETRY_AFTER_SECS.to_string())],
                "No more than N requests per minute allowed",
            )
                .into_response()
        }
        Outcome::Verdict(status) => {
            let accrual = (status == AccrualStatus::Processed).then(|| accrual_for(&number));
            debug!("Verdict for order {}: {:?} {:?}", number, status, accrual);
            Json(VerdictResponse {
                order: number,
                status,
                accrual,
            })
            .into_response()
        }
    }
}
