use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Accrual 시스템이 반환하는 주문 상태
/// Status reported by the accrual system
///
/// 원장의 `OrderStatus`와 달리 REGISTERED(접수만 됨)가 있습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccrualStatus {
    Registered,
    Processing,
    Invalid,
    Processed,
}

/// Accrual 시스템 판정 결과
/// Verdict for one order
///
/// 주문 번호는 요청한 번호와 일치하는지 클라이언트에서 검증한 뒤 버립니다.
#[derive(Debug, Clone, PartialEq)]
pub struct AccrualVerdict {
    pub status: AccrualStatus,
    /// 소수점 2자리로 반올림된 적립 포인트
    pub accrual: Option<Decimal>,
}

/// 한 번의 조정 틱 결과
/// Summary of one reconciliation tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// 틱 시작 시 대기 중이던 주문 수
    pub pending: usize,
    /// PROCESSED로 확정된 주문 수
    pub processed: usize,
    /// INVALID로 확정된 주문 수
    pub invalid: usize,
    /// NEW → PROCESSING 으로 진행된 주문 수
    pub progressed: usize,
    /// 판정은 받았지만 기록할 변화가 없던 주문 수
    pub unchanged: usize,
    /// 조회/기록에 실패한 주문 수 (다음 틱에서 재시도)
    pub failed: usize,
    /// 429로 틱이 중단되었는지
    pub rate_limited: bool,
}

impl TickReport {
    /// 이번 틱에서 accrual 시스템에 질의한 주문 수
    pub fn queried(&self) -> usize {
        self.processed + self.invalid + self.progressed + self.unchanged + self.failed
            + usize::from(self.rate_limited)
    }
}
