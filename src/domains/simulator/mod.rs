// Accrual simulator domain
// 로컬 실행/테스트용 accrual 시스템 흉내
pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::*;
