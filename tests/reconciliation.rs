// =====================================================
// 조정 루프 통합 테스트
// =====================================================
// 가짜 accrual 시스템 + 메모리 저장소로 틱 단위 동작을 검증
// =====================================================

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use common::*;
use points_ledger::domains::ledger::models::{
    Balance, Order, OrderNumber, OrderStatus, UserId, Withdrawal,
};
use points_ledger::domains::reconciliation::ReconciliationLoop;
use points_ledger::shared::database::{LedgerStore, MemoryStore};
use points_ledger::shared::errors::LedgerError;

fn reconciliation(store: &MemoryStore, oracle: &FakeOracle) -> ReconciliationLoop {
    ReconciliationLoop::new(Arc::new(store.clone()), oracle.client(), Duration::from_millis(50))
}

async fn status_of(store: &MemoryStore, number: &OrderNumber) -> (OrderStatus, Option<Decimal>) {
    let orders = store.list_orders(TEST_USER_ID).await.unwrap();
    let order = orders.iter().find(|o| &o.number == number).unwrap();
    (order.status, order.accrual)
}

#[tokio::test]
async fn processed_verdict_records_rounded_accrual() {
    let oracle = FakeOracle::start().await;
    let number = OrderNumber::parse("79927398713").unwrap();
    let store = MemoryStore::new();
    store.create_order(TEST_USER_ID, &number).await.unwrap();
    oracle.script(&number, Scripted::processed(12.345));

    let report = reconciliation(&store, &oracle).tick().await;

    assert_eq!(report.pending, 1);
    assert_eq!(report.processed, 1);
    assert!(!report.rate_limited);
    assert_eq!(
        status_of(&store, &number).await,
        (OrderStatus::Processed, Some(Decimal::new(1235, 2)))
    );

    let balance = store.get_balance(TEST_USER_ID).await.unwrap();
    assert_eq!(balance.current, Decimal::new(1235, 2));
    assert_eq!(balance.withdrawn, Decimal::ZERO);
}

#[tokio::test]
async fn rate_limit_aborts_remaining_orders() {
    let oracle = FakeOracle::start().await;
    let (store, numbers) = store_with_orders(5).await;
    oracle.script(&numbers[0], Scripted::processed(10.0));
    oracle.script(&numbers[1], Scripted::processed(20.0));
    oracle.script(&numbers[2], Scripted::RateLimited { retry_after: Some(60) });
    oracle.script(&numbers[3], Scripted::processed(30.0));
    oracle.script(&numbers[4], Scripted::processed(40.0));

    let report = reconciliation(&store, &oracle).tick().await;

    assert!(report.rate_limited);
    assert_eq!(report.processed, 2);
    assert_eq!(oracle.hits(&numbers[2]), 1);
    assert_eq!(oracle.hits(&numbers[3]), 0);
    assert_eq!(oracle.hits(&numbers[4]), 0);

    assert_eq!(status_of(&store, &numbers[0]).await.0, OrderStatus::Processed);
    assert_eq!(status_of(&store, &numbers[1]).await.0, OrderStatus::Processed);
    for number in &numbers[2..] {
        assert_eq!(status_of(&store, number).await, (OrderStatus::New, None));
    }

    // 다음 틱에서 나머지 주문을 이어서 처리
    oracle.script(&numbers[2], Scripted::processed(5.5));
    let report = reconciliation(&store, &oracle).tick().await;
    assert_eq!(report.pending, 3);
    assert_eq!(report.processed, 3);
    assert_eq!(
        store.get_balance(TEST_USER_ID).await.unwrap().current,
        Decimal::new(10550, 2)
    );
}

#[tokio::test]
async fn per_order_failures_do_not_stop_the_tick() {
    let oracle = FakeOracle::start().await;
    let (store, numbers) = store_with_orders(4).await;
    oracle.script(&numbers[0], Scripted::Status(500));
    oracle.script(&numbers[1], Scripted::Raw("{not json"));
    oracle.script(&numbers[2], Scripted::NoContent);
    oracle.script(&numbers[3], Scripted::processed(1.0));

    let report = reconciliation(&store, &oracle).tick().await;

    assert_eq!(report.failed, 2);
    assert_eq!(report.unchanged, 1);
    assert_eq!(report.processed, 1);
    for number in &numbers {
        assert_eq!(oracle.hits(number), 1);
    }
    assert_eq!(status_of(&store, &numbers[0]).await.0, OrderStatus::New);
    assert_eq!(status_of(&store, &numbers[3]).await.0, OrderStatus::Processed);
}

#[tokio::test]
async fn intermediate_and_invalid_verdicts() {
    let oracle = FakeOracle::start().await;
    let (store, numbers) = store_with_orders(3).await;
    oracle.script(&numbers[0], Scripted::status("REGISTERED"));
    oracle.script(&numbers[1], Scripted::status("PROCESSING"));
    oracle.script(&numbers[2], Scripted::status("INVALID"));

    let report = reconciliation(&store, &oracle).tick().await;
    assert_eq!(report.unchanged, 1);
    assert_eq!(report.progressed, 1);
    assert_eq!(report.invalid, 1);

    assert_eq!(status_of(&store, &numbers[0]).await, (OrderStatus::New, None));
    assert_eq!(status_of(&store, &numbers[1]).await, (OrderStatus::Processing, None));
    assert_eq!(status_of(&store, &numbers[2]).await, (OrderStatus::Invalid, None));

    // 종결된 주문은 다시 질의하지 않음
    let report = reconciliation(&store, &oracle).tick().await;
    assert_eq!(report.pending, 2);
    assert_eq!(oracle.hits(&numbers[2]), 1);

    // PROCESSING 상태에서 같은 판정을 다시 받으면 변화 없음
    assert_eq!(report.unchanged, 2);
}

#[tokio::test]
async fn processed_without_accrual_records_zero() {
    let oracle = FakeOracle::start().await;
    let (store, numbers) = store_with_orders(1).await;
    oracle.script(&numbers[0], Scripted::status("PROCESSED"));

    reconciliation(&store, &oracle).tick().await;

    assert_eq!(
        status_of(&store, &numbers[0]).await,
        (OrderStatus::Processed, Some(Decimal::ZERO))
    );
}

/// PROCESSED 기록을 한 번 실패시키는 저장소
struct FailingCompletionStore {
    inner: MemoryStore,
    fail_next: AtomicBool,
}

#[async_trait]
impl LedgerStore for FailingCompletionStore {
    async fn list_pending_orders(&self) -> Result<Vec<OrderNumber>, LedgerError> {
        self.inner.list_pending_orders().await
    }

    async fn set_order_status(
        &self,
        number: &OrderNumber,
        status: OrderStatus,
    ) -> Result<u64, LedgerError> {
        self.inner.set_order_status(number, status).await
    }

    async fn complete_order(
        &self,
        number: &OrderNumber,
        accrual: Decimal,
    ) -> Result<u64, LedgerError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(LedgerError::Database("connection reset".to_string()));
        }
        self.inner.complete_order(number, accrual).await
    }

    async fn create_order(&self, user_id: UserId, number: &OrderNumber) -> Result<bool, LedgerError> {
        self.inner.create_order(user_id, number).await
    }

    async fn list_orders(&self, user_id: UserId) -> Result<Vec<Order>, LedgerError> {
        self.inner.list_orders(user_id).await
    }

    async fn get_balance(&self, user_id: UserId) -> Result<Balance, LedgerError> {
        self.inner.get_balance(user_id).await
    }

    async fn withdraw(
        &self,
        user_id: UserId,
        order: &OrderNumber,
        sum: Decimal,
    ) -> Result<(), LedgerError> {
        self.inner.withdraw(user_id, order, sum).await
    }

    async fn list_withdrawals(&self, user_id: UserId) -> Result<Vec<Withdrawal>, LedgerError> {
        self.inner.list_withdrawals(user_id).await
    }
}

#[tokio::test]
async fn failed_processed_write_leaves_no_accrual_behind() {
    let oracle = FakeOracle::start().await;
    let (store, numbers) = store_with_orders(1).await;
    let number = &numbers[0];
    oracle.script(number, Scripted::processed(12.345));

    let flaky = Arc::new(FailingCompletionStore {
        inner: store.clone(),
        fail_next: AtomicBool::new(true),
    });
    let reconciliation =
        ReconciliationLoop::new(flaky, oracle.client(), Duration::from_millis(50));

    let report = reconciliation.tick().await;
    assert_eq!(report.failed, 1);
    assert_eq!(status_of(&store, number).await, (OrderStatus::New, None));

    let orders = store.list_orders(TEST_USER_ID).await.unwrap();
    let json = serde_json::to_value(&orders[0]).unwrap();
    assert_eq!(json["status"], "NEW");
    assert!(json.get("accrual").is_none());

    // 이후 INVALID 판정을 받아도 적립 포인트가 남지 않음
    oracle.script(number, Scripted::status("INVALID"));
    let report = reconciliation.tick().await;
    assert_eq!(report.invalid, 1);
    assert_eq!(status_of(&store, number).await, (OrderStatus::Invalid, None));
    assert_eq!(store.get_balance(TEST_USER_ID).await.unwrap().current, Decimal::ZERO);
}

#[tokio::test]
async fn cancelled_loop_queries_nothing() {
    let oracle = FakeOracle::start().await;
    let (store, numbers) = store_with_orders(2).await;
    oracle.script(&numbers[0], Scripted::processed(1.0));

    let reconciliation = reconciliation(&store, &oracle);
    reconciliation.cancellation_token().cancel();

    let report = reconciliation.tick().await;
    assert_eq!(report.pending, 2);
    assert_eq!(report.queried(), 0);
    assert_eq!(oracle.hits(&numbers[0]), 0);
}

#[tokio::test]
async fn spawned_loop_ticks_immediately_and_stops_on_cancel() {
    let oracle = FakeOracle::start().await;
    let (store, numbers) = store_with_orders(1).await;
    oracle.script(&numbers[0], Scripted::processed(7.0));

    let reconciliation = ReconciliationLoop::new(
        Arc::new(store.clone()),
        oracle.client(),
        Duration::from_secs(3600),
    );
    let cancel = reconciliation.cancellation_token();
    let handle = reconciliation.spawn();

    // 첫 틱은 주기와 관계없이 바로 실행됨
    let processed = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if status_of(&store, &numbers[0]).await.0 == OrderStatus::Processed {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(processed.is_ok(), "first tick did not run");

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("loop did not stop after cancellation")
        .unwrap();
}
