// =====================================================
// 통합 테스트 공통 헬퍼
// =====================================================
// 목적: 가짜 accrual 시스템과 저장소 셋업을 모든 통합 테스트에서 공유
//
// 사용법:
// ```rust
// mod common;
// use common::*;
//
// #[tokio::test]
// async fn test_something() {
//     let oracle = FakeOracle::start().await;
//     oracle.script(&number, Scripted::processed(12.345));
//     // 테스트 코드...
// }
// ```
// =====================================================
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{header::RETRY_AFTER, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::json;
use tokio::net::TcpListener;

use points_ledger::domains::ledger::models::{OrderNumber, UserId};
use points_ledger::shared::clients::AccrualClient;
use points_ledger::shared::database::{LedgerStore, MemoryStore};
use points_ledger::shared::utils::is_valid_luhn;

pub const TEST_USER_ID: UserId = 1;

/// 주문별로 미리 정해 둔 응답
#[derive(Debug, Clone)]
pub enum Scripted {
    Verdict {
        status: &'static str,
        accrual: Option<f64>,
    },
    RateLimited {
        retry_after: Option<u64>,
    },
    NoContent,
    Status(u16),
    Raw(&'static str),
}

impl Scripted {
    pub fn processed(accrual: f64) -> Self {
        Scripted::Verdict {
            status: "PROCESSED",
            accrual: Some(accrual),
        }
    }

    pub fn status(status: &'static str) -> Self {
        Scripted::Verdict { status, accrual: None }
    }
}

#[derive(Clone, Default)]
struct OracleState {
    script: Arc<Mutex<HashMap<String, Scripted>>>,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

/// 127.0.0.1의 임의 포트에서 동작하는 가짜 accrual 시스템
/// 스크립트가 없는 주문에는 204를 응답합니다.
pub struct FakeOracle {
    pub base_url: String,
    state: OracleState,
}

impl FakeOracle {
    pub async fn start() -> Self {
        let state = OracleState::default();
        let app = Router::new()
            .route("/api/orders/:number", get(handle))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn script(&self, number: &OrderNumber, response: Scripted) {
        self.state
            .script
            .lock()
            .insert(number.as_str().to_string(), response);
    }

    /// 해당 주문에 대한 요청 횟수
    pub fn hits(&self, number: &OrderNumber) -> usize {
        self.state
            .hits
            .lock()
            .get(number.as_str())
            .copied()
            .unwrap_or(0)
    }

    pub fn client(&self) -> AccrualClient {
        AccrualClient::new(&self.base_url, Duration::from_secs(5)).unwrap()
    }
}

async fn handle(State(state): State<OracleState>, Path(number): Path<String>) -> Response {
    *state.hits.lock().entry(number.clone()).or_insert(0) += 1;
    let scripted = state.script.lock().get(&number).cloned();

    match scripted {
        Some(Scripted::Verdict { status, accrual }) => {
            let mut body = json!({ "order": number, "status": status });
            if let Some(accrual) = accrual {
                body["accrual"] = json!(accrual);
            }
            Json(body).into_response()
        }
        Some(Scripted::RateLimited { retry_after }) => {
            let mut response = StatusCode::TOO_MANY_REQUESTS.into_response();
            if let Some(secs) = retry_after {
                response
                    .headers_mut()
                    .insert(RETRY_AFTER, secs.to_string().parse().unwrap());
            }
            response
        }
        Some(Scripted::Status(code)) => {
            (StatusCode::from_u16(code).unwrap(), "scripted failure").into_response()
        }
        Some(Scripted::Raw(body)) => {
            ([("content-type", "application/json")], body).into_response()
        }
        Some(Scripted::NoContent) | None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// prefix 뒤에 체크 디지트를 붙여 Luhn 검증을 통과하는 주문 번호 생성
pub fn luhn_number(prefix: u64) -> OrderNumber {
    for check in 0..10 {
        let candidate = format!("{}{}", prefix, check);
        if is_valid_luhn(&candidate) {
            return OrderNumber::parse(&candidate).unwrap();
        }
    }
    unreachable!("every prefix has exactly one Luhn check digit")
}

/// 사용자 주문 n개를 등록한 메모리 저장소
pub async fn store_with_orders(count: u64) -> (MemoryStore, Vec<OrderNumber>) {
    let store = MemoryStore::new();
    let mut numbers = Vec::new();
    for i in 0..count {
        let number = luhn_number(1_000_000 + i);
        assert!(store.create_order(TEST_USER_ID, &number).await.unwrap());
        numbers.push(number);
    }
    (store, numbers)
}
