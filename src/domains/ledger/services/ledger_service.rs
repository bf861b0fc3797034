use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::domains::ledger::models::{
    Balance, Order, OrderNumber, OrderSubmission, UserId, WithdrawRequest, Withdrawal,
};
use crate::shared::database::LedgerStore;
use crate::shared::errors::LedgerError;

// 원장 서비스
// 역할: 주문 등록, 잔고 조회, 출금 (입력 검증 후 저장소 호출)
// LedgerService: handles order/balance/withdrawal business logic
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn LedgerStore>,
}

impl LedgerService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// 주문 등록
    /// Submit an order number
    ///
    /// 1. 숫자 형식 확인 (400)
    /// 2. Luhn 검증 (422)
    /// 3. 저장 (이미 다른 사용자 것이면 409)
    pub async fn submit_order(
        &self,
        user_id: UserId,
        raw_number: &str,
    ) -> Result<OrderSubmission, LedgerError> {
        let number = OrderNumber::parse(raw_number)?;

        if self.store.create_order(user_id, &number).await? {
            info!("Order {} accepted for user {}", number, user_id);
            Ok(OrderSubmission::Accepted)
        } else {
            Ok(OrderSubmission::AlreadyUploaded)
        }
    }

    /// 사용자의 주문 목록 (업로드 순)
    pub async fn list_orders(&self, user_id: UserId) -> Result<Vec<Order>, LedgerError> {
        self.store.list_orders(user_id).await
    }

    /// 잔고 조회
    pub async fn get_balance(&self, user_id: UserId) -> Result<Balance, LedgerError> {
        self.store.get_balance(user_id).await
    }

    /// 출금
    /// Withdraw points against an order number
    ///
    /// 출금 대상 주문 번호는 사용자의 주문과 무관할 수 있으며,
    /// 형식 오류와 Luhn 실패 모두 422로 처리합니다.
    pub async fn withdraw(&self, user_id: UserId, request: WithdrawRequest) -> Result<(), LedgerError> {
        let order = OrderNumber::parse(&request.order).map_err(|e| match e {
            LedgerError::MalformedOrderNumber(number) => LedgerError::InvalidOrderNumber(number),
            other => other,
        })?;

        if request.sum <= Decimal::ZERO {
            return Err(LedgerError::InvalidSum(request.sum.to_string()));
        }

        self.store.withdraw(user_id, &order, request.sum).await?;
        info!("User {} withdrew {} points for order {}", user_id, request.sum, order);
        Ok(())
    }

    /// 사용자의 출금 내역 (처리 순)
    pub async fn list_withdrawals(&self, user_id: UserId) -> Result<Vec<Withdrawal>, LedgerError> {
        self.store.list_withdrawals(user_id).await
    }
}
