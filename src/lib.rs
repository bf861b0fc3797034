// Points ledger library
// 포인트 원장 + accrual 조정 루프
pub mod domains;
pub mod routes;
pub mod shared;
