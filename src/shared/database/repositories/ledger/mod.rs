// Ledger repositories
pub mod order_repository;
pub mod withdrawal_repository;

pub use order_repository::*;
pub use withdrawal_repository::*;
