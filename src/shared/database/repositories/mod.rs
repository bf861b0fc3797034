// Database repositories
// 역할: SQL 쿼리만 담당 (비즈니스 규칙은 Store/Service에서)
pub mod auth;
pub mod ledger;

pub use auth::*;
pub use ledger::*;
