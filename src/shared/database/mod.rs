// Shared database module
// 원장 저장소 계약과 구현 (PostgreSQL / 메모리)
pub mod connection;
pub mod memory;
pub mod postgres;
pub mod repositories;
pub mod store;

pub use connection::*;
pub use memory::*;
pub use postgres::*;
pub use store::*;
