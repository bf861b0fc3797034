use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serializer};

// =====================================================
// 포인트 고정 소수점 헬퍼
// Fixed-point points helpers
// =====================================================
// 모든 포인트 금액은 소수점 2자리 Decimal로 저장합니다.
// 반올림은 accrual 응답을 받는 경계에서 한 번만 수행하며,
// 은행가 반올림이 아니라 0에서 먼 쪽으로 반올림(half away from zero)합니다.
//
// 예시:
// - 12.345 → 12.35
// - 12.344 → 12.34
// - -0.005 → -0.01
// =====================================================

/// 포인트 소수점 자릿수
/// Fraction digits kept for every points amount
pub const POINTS_SCALE: u32 = 2;

/// 포인트 반올림 (half away from zero)
/// Round to the points scale, half away from zero
pub fn round_points(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(POINTS_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// f64 → Decimal 변환 후 반올림
/// Convert a JSON float into rounded points
///
/// f64의 Display는 왕복 가능한 최단 10진 표현을 출력하므로 12.345는 "12.345"가 되고,
/// 이진 부동소수점 오차(12.3449999…) 없이 반올림할 수 있습니다.
/// NaN/무한대는 None
pub fn points_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string()).ok().map(round_points)
}

/// Decimal을 JSON 숫자로 직렬화
/// Serialize points as a JSON number
pub fn serialize_points<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    // 10진 문자열을 거쳐 가장 가까운 f64로 변환
    serializer.serialize_f64(value.to_string().parse::<f64>().unwrap_or_default())
}

/// Option<Decimal>을 JSON 숫자로 직렬화 (skip_serializing_if와 함께 사용)
/// Serialize optional points as a JSON number
pub fn serialize_points_opt<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) => serialize_points(v, serializer),
        None => serializer.serialize_none(),
    }
}

/// JSON 숫자를 반올림된 Decimal로 역직렬화
/// Deserialize a JSON number into rounded points
pub fn deserialize_points<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    points_from_f64(raw).ok_or_else(|| serde::de::Error::custom(format!("invalid points amount: {}", raw)))
}

/// Option 버전 (accrual 필드처럼 생략 가능한 경우)
/// Optional variant, for fields the peer may omit
pub fn deserialize_points_opt<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    match raw {
        Some(v) => points_from_f64(v)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid points amount: {}", v))),
        None => Ok(None),
    }
}
