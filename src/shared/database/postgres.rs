use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domains::auth::models::User;
use crate::domains::ledger::models::{Balance, Order, OrderNumber, OrderStatus, UserId, Withdrawal};
use crate::shared::database::connection::Database;
use crate::shared::database::repositories::{OrderRepository, UserRepository, WithdrawalRepository};
use crate::shared::database::store::{LedgerStore, UserStore};
use crate::shared::errors::LedgerError;

/// PostgreSQL 저장소
/// PostgreSQL-backed ledger store
///
/// 각 연산은 Repository를 생성해 SQL을 실행하고,
/// anyhow 에러는 `LedgerError::Database`로 변환합니다.
#[derive(Clone)]
pub struct PgStore {
    db: Database,
}

impl PgStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.db.pool().clone())
    }

    fn withdrawals(&self) -> WithdrawalRepository {
        WithdrawalRepository::new(self.db.pool().clone())
    }

    fn users(&self) -> UserRepository {
        UserRepository::new(self.db.pool().clone())
    }
}

#[async_trait]
impl LedgerStore for PgStore {
    async fn list_pending_orders(&self) -> Result<Vec<OrderNumber>, LedgerError> {
        Ok(self.orders().get_pending_numbers().await?)
    }

    async fn set_order_status(
        &self,
        number: &OrderNumber,
        status: OrderStatus,
    ) -> Result<u64, LedgerError> {
        if status == OrderStatus::Processed {
            return Ok(0);
        }
        Ok(self.orders().update_status(number, status).await?)
    }

    async fn complete_order(
        &self,
        number: &OrderNumber,
        accrual: Decimal,
    ) -> Result<u64, LedgerError> {
        Ok(self.orders().mark_processed(number, accrual).await?)
    }

    async fn create_order(&self, user_id: UserId, number: &OrderNumber) -> Result<bool, LedgerError> {
        let order_repo = self.orders();

        // 1. 삽입 시도 (동시 등록 시에도 한 행만 생성됨)
        if order_repo.insert_if_absent(user_id, number).await? {
            return Ok(true);
        }

        // 2. 이미 있으면 소유자 확인
        match order_repo.get_owner(number).await? {
            Some(owner) if owner == user_id => Ok(false),
            Some(_) => Err(LedgerError::OrderOwnedByAnotherUser {
                number: number.to_string(),
            }),
            None => Err(LedgerError::Database(format!(
                "Order {} conflicted on insert but was not found",
                number
            ))),
        }
    }

    async fn list_orders(&self, user_id: UserId) -> Result<Vec<Order>, LedgerError> {
        Ok(self.orders().get_all_by_user(user_id).await?)
    }

    async fn get_balance(&self, user_id: UserId) -> Result<Balance, LedgerError> {
        let (accrued, withdrawn) = self.withdrawals().get_totals(user_id).await?;
        Ok(Balance::from_totals(accrued, withdrawn))
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

        if self.withdrawals().withdraw_if_sufficient(user_id, order, sum).await? {
            Ok(())
        } else {
            Err(LedgerError::InsufficientFunds)
        }
    }

    async fn list_withdrawals(&self, user_id: UserId) -> Result<Vec<Withdrawal>, LedgerError> {
        Ok(self.withdrawals().get_all_by_user(user_id).await?)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, login: &str, password_hash: &str) -> Result<UserId, LedgerError> {
        self.users()
            .create_user(login, password_hash)
            .await?
            .ok_or_else(|| LedgerError::UserAlreadyExists {
                login: login.to_string(),
            })
    }

    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, LedgerError> {
        Ok(self.users().get_user_by_login(login).await?)
    }
}
