use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domains::ledger::models::UserId;

/// JWT Claims
/// Access Token에 담기는 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: UserId,
    pub login: String,
    /// 발급 시간 (unix seconds)
    pub iat: i64,
    /// 만료 시간 (unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: UserId, login: String, ttl_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            user_id,
            login,
            iat: now,
            exp: now + ttl_secs,
        }
    }
}
