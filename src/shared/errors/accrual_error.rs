use std::time::Duration;
use thiserror::Error;

/// Accrual 시스템 호출 에러
/// Accrual oracle call errors
///
/// `RateLimited`는 에러라기보다 스케줄링 신호입니다.
/// 조정 루프는 이 값을 받으면 현재 틱의 나머지 주문을 처리하지 않습니다.
#[derive(Error, Debug)]
pub enum AccrualError {
    /// 429 Too Many Requests
    #[error("Accrual system is rate limiting requests (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    /// 204 No Content: accrual 시스템에 등록되지 않은 주문
    /// Order is not registered in the accrual system
    #[error("Order {0} is not registered in the accrual system")]
    NotRegistered(String),

    /// 예상하지 못한 HTTP 상태 코드
    /// Unexpected HTTP status
    #[error("Accrual system returned {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// 응답 파싱 실패 또는 잘못된 값
    /// Malformed response body
    #[error("Failed to decode accrual response: {0}")]
    Decode(String),

    /// 네트워크/전송 오류
    /// Transport failure
    #[error("Failed to reach accrual system: {0}")]
    Transport(#[from] reqwest::Error),
}

impl AccrualError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AccrualError::RateLimited { .. })
    }
}
