use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::shared::utils::serialize_points;

/// 포인트 잔고 (저장하지 않고 매번 원장에서 계산)
/// Points balance, derived from the ledger on every read
///
/// - current = PROCESSED 주문 적립 합계 - 출금 합계
/// - withdrawn = 출금 합계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
pub struct Balance {
    /// 사용 가능 포인트
    /// Points available for withdrawal
    #[serde(serialize_with = "serialize_points")]
    #[schema(value_type = f64, example = 500.5)]
    pub current: Decimal,

    /// 누적 출금 포인트
    /// Total points withdrawn so far
    #[serde(serialize_with = "serialize_points")]
    #[schema(value_type = f64, example = 42)]
    pub withdrawn: Decimal,
}

impl Balance {
    /// 적립 합계와 출금 합계로 잔고 계산
    /// Build a balance from the accrued and withdrawn totals
    pub fn from_totals(accrued: Decimal, withdrawn: Decimal) -> Self {
        Self {
            current: accrued - withdrawn,
            withdrawn,
        }
    }
}
