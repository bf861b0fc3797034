// Ledger domain models
pub mod balance;
pub mod order;
pub mod withdrawal;

pub use balance::*;
pub use order::*;
pub use withdrawal::*;
