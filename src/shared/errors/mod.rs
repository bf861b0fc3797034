// Shared errors
pub mod accrual_error;
pub mod auth_error;
pub mod config_error;
pub mod ledger_error;

pub use accrual_error::*;
pub use auth_error::*;
pub use config_error::*;
pub use ledger_error::*;
