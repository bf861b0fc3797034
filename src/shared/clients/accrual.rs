use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::domains::ledger::models::OrderNumber;
use crate::domains::reconciliation::models::{AccrualStatus, AccrualVerdict};
use crate::shared::errors::AccrualError;
use crate::shared::utils::deserialize_points_opt;

// 원장 컬럼 NUMERIC(14, 2)에 들어가는 최대 적립 포인트
const MAX_ACCRUAL: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

// Accrual 시스템 응답 본문
#[derive(Debug, Deserialize)]
struct VerdictBody {
    order: String,
    status: AccrualStatus,
    #[serde(default, deserialize_with = "deserialize_points_opt")]
    accrual: Option<Decimal>,
}

// Accrual 시스템 클라이언트
// Accrual system HTTP client
//
// GET {base_url}/api/orders/{number}
// - 200: 판정 JSON
// - 204: 등록되지 않은 주문
// - 429: 요청 제한 (Retry-After 초)
//
// 재시도는 하지 않습니다. 재시도 시점은 조정 루프의 다음 틱입니다.
#[derive(Clone)]
pub struct AccrualClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AccrualClient {
    // 클라이언트 생성
    // Create new accrual client instance
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // 주문 판정 조회
    // Fetch the verdict for one order
    pub async fn fetch_verdict(&self, number: &OrderNumber) -> Result<AccrualVerdict, AccrualError> {
        let url = format!("{}/api/orders/{}", self.base_url, number);
        debug!("Requesting accrual system: {}", url);

        let response = self
            .http_client
            .get(&url)
            .header("User-Agent", "points-ledger/1.0")
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NO_CONTENT => {
                return Err(AccrualError::NotRegistered(number.to_string()));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = parse_retry_after(response.headers());
                return Err(AccrualError::RateLimited { retry_after });
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(AccrualError::UnexpectedStatus {
                    status: status.as_u16(),
                    body,
                });
            }
        }

        // JSON 파싱 (적립 포인트는 이 시점에 소수점 2자리로 반올림됨)
        let bytes = response.bytes().await?;
        let body: VerdictBody = serde_json::from_slice(&bytes)
            .map_err(|e| AccrualError::Decode(e.to_string()))?;

        if body.order != number.as_str() {
            return Err(AccrualError::Decode(format!(
                "verdict is for order {}, expected {}",
                body.order, number
            )));
        }
        if let Some(accrual) = body.accrual {
            if accrual < Decimal::ZERO {
                return Err(AccrualError::Decode(format!("negative accrual {}", accrual)));
            }
            if accrual > MAX_ACCRUAL {
                return Err(AccrualError::Decode(format!("accrual {} is out of range", accrual)));
            }
        }

        Ok(AccrualVerdict {
            status: body.status,
            accrual: body.accrual,
        })
    }
}

// Retry-After 헤더 (초 단위만 지원)
fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
