use chrono::{DateTime, Utc};

use crate::domains::ledger::models::UserId;

/// 사용자 (생성 후 변경되지 않음)
/// User account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub login: String,
    /// argon2 PHC 문자열
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
