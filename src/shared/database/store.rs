use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domains::auth::models::User;
use crate::domains::ledger::models::{Balance, Order, OrderNumber, OrderStatus, UserId, Withdrawal};
use crate::shared::errors::LedgerError;

// =====================================================
// 원장 저장소 계약
// Ledger store contract
// =====================================================
// 조정 루프와 HTTP 계층은 이 trait만 사용합니다.
// 구현체: PgStore (운영), MemoryStore (테스트/로컬 실행)
//
// 불변 조건:
// - 상태 전이는 앞으로만 진행 (NEW → PROCESSING → PROCESSED/INVALID)
// - 종결 상태의 주문은 accrual이 바뀌지 않음
// - accrual은 PROCESSED 주문에만 존재 (상태와 함께 한 번에 기록)
// - 출금 후 잔고가 음수가 되지 않음 (검사와 기록이 원자적)
// =====================================================

/// 주문/잔고/출금 저장소
/// Orders, balances and withdrawals
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// NEW 또는 PROCESSING 상태의 주문 번호 (업로드 순)
    /// Orders still waiting for a verdict, oldest first
    async fn list_pending_orders(&self) -> Result<Vec<OrderNumber>, LedgerError>;

    /// 상태 변경. 허용되지 않는 전이는 무시되고 0을 반환
    /// Move an order forward; returns the number of affected rows
    ///
    /// PROCESSED는 적립 포인트 없이 기록할 수 없으므로 항상 0입니다. `complete_order`를 사용하세요.
    async fn set_order_status(
        &self,
        number: &OrderNumber,
        status: OrderStatus,
    ) -> Result<u64, LedgerError>;

    /// PROCESSED 확정. 상태와 적립 포인트를 한 번에 기록하며 종결 상태의 주문은 변경하지 않음
    /// Mark a non-terminal order PROCESSED together with its accrual; returns affected rows
    async fn complete_order(
        &self,
        number: &OrderNumber,
        accrual: Decimal,
    ) -> Result<u64, LedgerError>;

    /// 주문 등록
    /// Register an order for a user
    ///
    /// - 새로 등록: `Ok(true)`
    /// - 같은 사용자가 이미 등록: `Ok(false)` (변경 없음)
    /// - 다른 사용자가 등록: `OrderOwnedByAnotherUser`
    async fn create_order(&self, user_id: UserId, number: &OrderNumber) -> Result<bool, LedgerError>;

    /// 사용자의 주문 목록 (업로드 순)
    async fn list_orders(&self, user_id: UserId) -> Result<Vec<Order>, LedgerError>;

    /// 원장에서 잔고 계산
    async fn get_balance(&self, user_id: UserId) -> Result<Balance, LedgerError>;

    /// 출금. 잔고가 부족하면 `InsufficientFunds`이며 아무것도 기록하지 않음
    /// Debit points atomically; nothing is written on `InsufficientFunds`
    async fn withdraw(
        &self,
        user_id: UserId,
        order: &OrderNumber,
        sum: Decimal,
    ) -> Result<(), LedgerError>;

    /// 사용자의 출금 내역 (처리 순)
    async fn list_withdrawals(&self, user_id: UserId) -> Result<Vec<Withdrawal>, LedgerError>;
}

/// 사용자 저장소
/// User accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 사용자 생성. 로그인이 이미 있으면 `UserAlreadyExists`
    async fn create_user(&self, login: &str, password_hash: &str) -> Result<UserId, LedgerError>;

    /// 로그인으로 사용자 조회
    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, LedgerError>;
}
