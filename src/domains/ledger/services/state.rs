// Ledger domain state
// 원장 도메인 상태
use std::sync::Arc;

use crate::domains::ledger::services::LedgerService;
use crate::shared::database::LedgerStore;

/// Ledger domain state
/// 원장 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct LedgerState {
    pub ledger_service: LedgerService,
}

impl LedgerState {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            ledger_service: LedgerService::new(store),
        }
    }
}
