use std::sync::Arc;

use crate::domains::auth::services::{AuthState, JwtService};
use crate::domains::ledger::services::LedgerState;
use crate::shared::database::{LedgerStore, UserStore};

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
///
/// 저장소는 trait 객체로 주입되므로 PostgreSQL과 메모리 저장소를 같은 방식으로 사용합니다.
#[derive(Clone)]
pub struct AppState {
    pub auth_state: AuthState,
    pub ledger_state: LedgerState,
}

impl AppState {
    pub fn new(
        ledger_store: Arc<dyn LedgerStore>,
        user_store: Arc<dyn UserStore>,
        jwt_service: JwtService,
    ) -> Self {
        Self {
            auth_state: AuthState::new(user_store, jwt_service),
            ledger_state: LedgerState::new(ledger_store),
        }
    }
}
