/// 공유 유틸리티 모듈
/// Shared Utilities Module
///
/// 역할:
/// - 주문 번호 Luhn 검증
/// - 포인트 고정 소수점 반올림/직렬화
/// - tracing 초기화
pub mod luhn;
pub mod points;
pub mod telemetry;

pub use luhn::*;
pub use points::*;
pub use telemetry::*;
