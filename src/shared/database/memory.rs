use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domains::auth::models::User;
use crate::domains::ledger::models::{Balance, Order, OrderNumber, OrderStatus, UserId, Withdrawal};
use crate::shared::database::store::{LedgerStore, UserStore};
use crate::shared::errors::LedgerError;

/// 메모리 저장소
/// In-memory ledger store
///
/// 테스트와 `--in-memory` 로컬 실행용입니다.
/// 모든 연산은 하나의 Mutex 안에서 수행되므로 출금의 잔고 검사와 기록이 원자적입니다.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    /// 업로드 순서 유지
    orders: Vec<Order>,
    /// 처리 순서 유지
    withdrawals: Vec<Withdrawal>,
}

impl Inner {
    fn order_mut(&mut self, number: &OrderNumber) -> Option<&mut Order> {
        self.orders.iter_mut().find(|o| &o.number == number)
    }

    fn balance(&self, user_id: UserId) -> Balance {
        let accrued: Decimal = self
            .orders
            .iter()
            .filter(|o| o.user_id == user_id && o.status == OrderStatus::Processed)
            .filter_map(|o| o.accrual)
            .sum();
        let withdrawn: Decimal = self
            .withdrawals
            .iter()
            .filter(|w| w.user_id == user_id)
            .map(|w| w.sum)
            .sum();
        Balance::from_totals(accrued, withdrawn)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn list_pending_orders(&self) -> Result<Vec<OrderNumber>, LedgerError> {
        let inner = self.inner.lock();
        Ok(inner
            .orders
            .iter()
            .filter(|o| !o.status.is_terminal())
            .map(|o| o.number.clone())
            .collect())
    }

    async fn set_order_status(
        &self,
        number: &OrderNumber,
        status: OrderStatus,
    ) -> Result<u64, LedgerError> {
        if status == OrderStatus::Processed {
            return Ok(0);
        }

        let mut inner = self.inner.lock();
        match inner.order_mut(number) {
            Some(order) if order.status.can_transition_to(status) => {
                order.status = status;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn complete_order(
        &self,
        number: &OrderNumber,
        accrual: Decimal,
    ) -> Result<u64, LedgerError> {
        let mut inner = self.inner.lock();
        match inner.order_mut(number) {
            Some(order) if order.status.can_transition_to(OrderStatus::Processed) => {
                order.status = OrderStatus::Processed;
                order.accrual = Some(accrual);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn create_order(&self, user_id: UserId, number: &OrderNumber) -> Result<bool, LedgerError> {
        let mut inner = self.inner.lock();
        if let Some(existing) = inner.orders.iter().find(|o| &o.number == number) {
            return if existing.user_id == user_id {
                Ok(false)
            } else {
                Err(LedgerError::OrderOwnedByAnotherUser {
                    number: number.to_string(),
                })
            };
        }

        inner.orders.push(Order {
            number: number.clone(),
            user_id,
            status: OrderStatus::New,
            accrual: None,
            uploaded_at: Utc::now(),
        });
        Ok(true)
    }

    async fn list_orders(&self, user_id: UserId) -> Result<Vec<Order>, LedgerError> {
        let inner = self.inner.lock();
        Ok(inner
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_balance(&self, user_id: UserId) -> Result<Balance, LedgerError> {
        Ok(self.inner.lock().balance(user_id))
    }

    async fn withdraw(
        &self,
        user_id: UserId,
        order: &OrderNumber,
        sum: Decimal,
    ) -> Result<(), LedgerError> {
        if sum <= Decimal::ZERO {
            return Err(LedgerError::InvalidSum(sum.to_string()));
        }

        let mut inner = self.inner.lock();
        if inner.balance(user_id).current < sum {
            return Err(LedgerError::InsufficientFunds);
        }

        inner.withdrawals.push(Withdrawal {
            order: order.clone(),
            user_id,
            sum,
            processed_at: Utc::now(),
        });
        Ok(())
    }

    async fn list_withdrawals(&self, user_id: UserId) -> Result<Vec<Withdrawal>, LedgerError> {
        let inner = self.inner.lock();
        Ok(inner
            .withdrawals
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, login: &str, password_hash: &str) -> Result<UserId, LedgerError> {
        let mut inner = self.inner.lock();
        if inner.users.iter().any(|u| u.login == login) {
            return Err(LedgerError::UserAlreadyExists {
                login: login.to_string(),
            });
        }

        let id = inner.users.len() as UserId + 1;
        inner.users.push(User {
            id,
            login: login.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, LedgerError> {
        let inner = self.inner.lock();
        Ok(inner.users.iter().find(|u| u.login == login).cloned())
    }
}
