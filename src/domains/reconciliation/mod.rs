// Reconciliation domain
// 주문 판정 조정 루프
pub mod models;
pub mod scheduler;

pub use models::*;
pub use scheduler::*;
