// Ledger domain handlers
pub mod balance_handler;
pub mod order_handler;

pub use balance_handler::*;
pub use order_handler::*;
