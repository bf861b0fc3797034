use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::errors::LedgerError;
use crate::shared::utils::{is_valid_luhn, serialize_points_opt};

/// 사용자 ID (users.id, BIGSERIAL)
/// User identifier
pub type UserId = i64;

// =====================================================
// 주문 번호
// Order number
// =====================================================
// 숫자로만 이루어진 문자열이며 Luhn 검증을 통과해야 합니다.
// 선행 0을 보존하기 위해 정수가 아니라 문자열로 보관합니다.
// =====================================================

/// 주문 번호 최대 길이 (orders.number, withdrawals.order_number 컬럼)
pub const MAX_ORDER_NUMBER_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// 사용자 입력을 주문 번호로 변환
    /// Parse user input into an order number
    ///
    /// - 공백 제거 후 비어 있거나 숫자가 아닌 문자가 있거나 64자를 넘으면 `MalformedOrderNumber`
    /// - Luhn 검증 실패 시 `InvalidOrderNumber`
    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        let number = raw.trim();
        if number.is_empty()
            || number.len() > MAX_ORDER_NUMBER_LEN
            || !number.chars().all(|c| c.is_ascii_digit())
        {
            return Err(LedgerError::MalformedOrderNumber(number.to_string()));
        }
        if !is_valid_luhn(number) {
            return Err(LedgerError::InvalidOrderNumber(number.to_string()));
        }
        Ok(Self(number.to_string()))
    }

    /// 저장소에서 읽은 값 (저장 전에 이미 검증됨)
    /// Wrap a number read back from storage
    pub(crate) fn from_stored(number: String) -> Self {
        Self(number)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OrderNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =====================================================
// 주문 상태
// Order status
// =====================================================
// NEW → PROCESSING → {PROCESSED, INVALID}
// PROCESSED, INVALID는 종결 상태이며 이후 변경되지 않습니다.
// =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    Processing,
    Invalid,
    Processed,
}

impl OrderStatus {
    /// DB 저장 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Invalid => "INVALID",
            OrderStatus::Processed => "PROCESSED",
        }
    }

    /// 종결 상태 여부
    /// Whether no further transition is allowed
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Invalid | OrderStatus::Processed)
    }

    /// 이 상태로 전이할 수 있는 이전 상태들
    /// States an order may be in right before moving to `self`
    pub fn predecessors(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::New => &[],
            OrderStatus::Processing => &[OrderStatus::New],
            OrderStatus::Invalid | OrderStatus::Processed => {
                &[OrderStatus::New, OrderStatus::Processing]
            }
        }
    }

    /// `self`에서 `next`로 전이 가능한지 확인
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        next.predecessors().contains(self)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(OrderStatus::New),
            "PROCESSING" => Ok(OrderStatus::Processing),
            "INVALID" => Ok(OrderStatus::Invalid),
            "PROCESSED" => Ok(OrderStatus::Processed),
            other => anyhow::bail!("Unknown order status: {}", other),
        }
    }
}

/// 주문 정보
/// Order record
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Order {
    /// 주문 번호
    /// Order number
    #[schema(value_type = String, example = "79927398713")]
    pub number: OrderNumber,

    /// 소유자 ID (응답에는 포함되지 않음)
    #[serde(skip)]
    pub user_id: UserId,

    /// 처리 상태
    /// Processing status
    pub status: OrderStatus,

    /// 적립 포인트 (PROCESSED일 때만 존재)
    /// Accrued points, present only for PROCESSED orders
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_points_opt"
    )]
    #[schema(value_type = Option<f64>, example = 500)]
    pub accrual: Option<Decimal>,

    /// 업로드 시간
    /// Upload time (RFC 3339)
    pub uploaded_at: DateTime<Utc>,
}

/// 주문 등록 결과
/// Outcome of an order submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSubmission {
    /// 새로 등록됨 (202)
    Accepted,
    /// 같은 사용자가 이미 등록함 (200)
    AlreadyUploaded,
}
