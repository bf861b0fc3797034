use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;

/// 원장(주문/잔고/출금) 관련 에러
/// Ledger errors (orders, balance, withdrawals)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// 주문 번호 형식 오류 (숫자가 아님)
    /// Order number is not a digit string
    #[error("Malformed order number: {0}")]
    MalformedOrderNumber(String),

    /// Luhn 검증 실패
    /// Order number failed the Luhn check
    #[error("Invalid order number: {0}")]
    InvalidOrderNumber(String),

    /// 다른 사용자가 이미 등록한 주문
    /// Order already uploaded by another user
    #[error("Order {number} is owned by another user")]
    OrderOwnedByAnotherUser { number: String },

    /// 잔고 부족
    /// Not enough points for the withdrawal
    #[error("Insufficient balance")]
    InsufficientFunds,

    /// 출금 금액 오류 (0 이하)
    /// Withdrawal sum must be positive
    #[error("Invalid withdrawal sum: {0}")]
    InvalidSum(String),

    /// 로그인 중복
    /// Login already taken
    #[error("User already exists: {login}")]
    UserAlreadyExists { login: String },

    /// 데이터베이스 에러
    /// Database error
    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for LedgerError {
    fn from(err: anyhow::Error) -> Self {
        LedgerError::Database(format!("{:#}", err))
    }
}

/// LedgerError를 HTTP 응답으로 변환
impl From<LedgerError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: LedgerError) -> Self {
        let status = match &err {
            LedgerError::MalformedOrderNumber(_) => StatusCode::BAD_REQUEST,
            LedgerError::InvalidOrderNumber(_) => StatusCode::UNPROCESSABLE_ENTITY,
            LedgerError::OrderOwnedByAnotherUser { .. } => StatusCode::CONFLICT,
            LedgerError::InsufficientFunds => StatusCode::PAYMENT_REQUIRED,
            LedgerError::InvalidSum(_) => StatusCode::BAD_REQUEST,
            LedgerError::UserAlreadyExists { .. } => StatusCode::CONFLICT,
            LedgerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": err.to_string() })))
    }
}
