// Domains module
pub mod auth;
pub mod ledger;
pub mod reconciliation;
pub mod simulator;
