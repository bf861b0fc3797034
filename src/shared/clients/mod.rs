// External service clients
pub mod accrual;

pub use accrual::*;
