use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::order::{OrderNumber, UserId};
use crate::shared::utils::{deserialize_points, serialize_points};

/// 출금 내역
/// Withdrawal record (immutable once written)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Withdrawal {
    /// 출금 대상 주문 번호
    /// Order number the points were spent on
    #[schema(value_type = String, example = "2377225624")]
    pub order: OrderNumber,

    #[serde(skip)]
    pub user_id: UserId,

    /// 출금 포인트
    /// Withdrawn points
    #[serde(serialize_with = "serialize_points")]
    #[schema(value_type = f64, example = 500)]
    pub sum: Decimal,

    /// 처리 시간
    /// Processing time (RFC 3339)
    pub processed_at: DateTime<Utc>,
}

// 출금 요청 모델
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = WithdrawRequest)]
pub struct WithdrawRequest {
    /// 주문 번호 (Luhn 검증)
    /// Order number (Luhn-checked)
    #[schema(example = "2377225624")]
    pub order: String,

    /// 출금 포인트 (소수점 2자리로 반올림)
    /// Points to withdraw, rounded to 2 decimals
    #[serde(deserialize_with = "deserialize_points")]
    #[schema(value_type = f64, example = 751)]
    pub sum: Decimal,
}
