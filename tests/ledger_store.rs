// =====================================================
// 원장 저장소 계약 테스트 (메모리 저장소)
// =====================================================

mod common;

use std::sync::Arc;

use rust_decimal::Decimal;

use common::*;
use points_ledger::domains::ledger::models::{OrderNumber, OrderStatus};
use points_ledger::shared::database::{LedgerStore, MemoryStore, UserStore};
use points_ledger::shared::errors::LedgerError;

/// 원시 행으로부터 잔고를 다시 계산
async fn recomputed_current(store: &MemoryStore) -> Decimal {
    let accrued: Decimal = store
        .list_orders(TEST_USER_ID)
        .await
        .unwrap()
        .iter()
        .filter(|o| o.status == OrderStatus::Processed)
        .filter_map(|o| o.accrual)
        .sum();
    let withdrawn: Decimal = store
        .list_withdrawals(TEST_USER_ID)
        .await
        .unwrap()
        .iter()
        .map(|w| w.sum)
        .sum();
    accrued - withdrawn
}

async fn process(store: &MemoryStore, number: &OrderNumber, accrual: Decimal) {
    assert_eq!(store.complete_order(number, accrual).await.unwrap(), 1);
}

#[tokio::test]
async fn create_order_is_idempotent_per_owner() {
    let store = MemoryStore::new();
    let number = luhn_number(4242);

    assert!(store.create_order(1, &number).await.unwrap());
    assert!(!store.create_order(1, &number).await.unwrap());
    assert_eq!(
        store.create_order(2, &number).await,
        Err(LedgerError::OrderOwnedByAnotherUser {
            number: number.to_string()
        })
    );

    assert_eq!(store.list_orders(1).await.unwrap().len(), 1);
    assert!(store.list_orders(2).await.unwrap().is_empty());
}

#[tokio::test]
async fn status_writes_only_move_forward() {
    let (store, numbers) = store_with_orders(1).await;
    let number = &numbers[0];

    assert_eq!(store.set_order_status(number, OrderStatus::Processing).await.unwrap(), 1);
    assert_eq!(store.set_order_status(number, OrderStatus::Processing).await.unwrap(), 0);
    assert_eq!(store.set_order_status(number, OrderStatus::Invalid).await.unwrap(), 1);
    assert_eq!(store.set_order_status(number, OrderStatus::Processed).await.unwrap(), 0);
    assert_eq!(store.complete_order(number, Decimal::ONE).await.unwrap(), 0);
    assert_eq!(store.list_orders(TEST_USER_ID).await.unwrap()[0].accrual, None);

    let missing = luhn_number(999);
    assert_eq!(store.set_order_status(&missing, OrderStatus::Processed).await.unwrap(), 0);
    assert!(store.list_pending_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn accrual_is_written_only_with_processed_status() {
    let (store, numbers) = store_with_orders(2).await;

    // 상태만으로는 PROCESSED가 될 수 없음
    assert_eq!(store.set_order_status(&numbers[0], OrderStatus::Processed).await.unwrap(), 0);

    store.set_order_status(&numbers[1], OrderStatus::Processing).await.unwrap();
    assert_eq!(store.complete_order(&numbers[1], Decimal::new(1235, 2)).await.unwrap(), 1);

    for order in store.list_orders(TEST_USER_ID).await.unwrap() {
        assert_eq!(order.status == OrderStatus::Processed, order.accrual.is_some());
    }
    assert_eq!(store.list_pending_orders().await.unwrap(), vec![numbers[0].clone()]);
}

#[tokio::test]
async fn pending_orders_follow_upload_order() {
    let (store, numbers) = store_with_orders(3).await;
    process(&store, &numbers[1], Decimal::ONE).await;

    assert_eq!(
        store.list_pending_orders().await.unwrap(),
        vec![numbers[0].clone(), numbers[2].clone()]
    );
}

#[tokio::test]
async fn balance_matches_raw_rows_after_withdrawals() {
    let (store, numbers) = store_with_orders(3).await;
    process(&store, &numbers[0], Decimal::new(50050, 2)).await;
    process(&store, &numbers[1], Decimal::new(120, 0)).await;
    // PROCESSING 주문은 잔고에 포함되지 않음
    store.set_order_status(&numbers[2], OrderStatus::Processing).await.unwrap();

    let target = luhn_number(77);
    store.withdraw(TEST_USER_ID, &target, Decimal::new(10025, 2)).await.unwrap();
    store.withdraw(TEST_USER_ID, &target, Decimal::new(20, 0)).await.unwrap();

    let balance = store.get_balance(TEST_USER_ID).await.unwrap();
    assert_eq!(balance.current, Decimal::new(50025, 2));
    assert_eq!(balance.withdrawn, Decimal::new(12025, 2));
    assert_eq!(balance.current, recomputed_current(&store).await);
    assert_eq!(store.list_withdrawals(TEST_USER_ID).await.unwrap().len(), 2);
}

#[tokio::test]
async fn over_withdrawal_leaves_ledger_unchanged() {
    let (store, numbers) = store_with_orders(1).await;
    process(&store, &numbers[0], Decimal::new(100, 0)).await;
    let before = store.get_balance(TEST_USER_ID).await.unwrap();

    let result = store
        .withdraw(TEST_USER_ID, &luhn_number(55), Decimal::new(10001, 2))
        .await;

    assert_eq!(result, Err(LedgerError::InsufficientFunds));
    assert_eq!(store.get_balance(TEST_USER_ID).await.unwrap(), before);
    assert!(store.list_withdrawals(TEST_USER_ID).await.unwrap().is_empty());

    // 잔고 전액 출금은 허용
    store
        .withdraw(TEST_USER_ID, &luhn_number(55), Decimal::new(100, 0))
        .await
        .unwrap();
    assert_eq!(store.get_balance(TEST_USER_ID).await.unwrap().current, Decimal::ZERO);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_withdrawals_never_overdraw() {
    let (store, numbers) = store_with_orders(1).await;
    process(&store, &numbers[0], Decimal::new(100, 0)).await;
    let store = Arc::new(store);

    let mut handles = Vec::new();
    for i in 0..20 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .withdraw(TEST_USER_ID, &luhn_number(500 + i), Decimal::new(15, 0))
                .await
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => succeeded += 1,
            Err(e) => assert_eq!(e, LedgerError::InsufficientFunds),
        }
    }

    // 100 / 15 = 6회만 성공
    assert_eq!(succeeded, 6);
    let balance = store.get_balance(TEST_USER_ID).await.unwrap();
    assert_eq!(balance.current, Decimal::new(10, 0));
    assert!(balance.current >= Decimal::ZERO);
}

#[tokio::test]
async fn users_are_unique_by_login() {
    let store = MemoryStore::new();
    let id = store.create_user("alice", "hash").await.unwrap();

    assert!(matches!(
        store.create_user("alice", "other").await,
        Err(LedgerError::UserAlreadyExists { .. })
    ));
    let user = store.find_user_by_login("alice").await.unwrap().unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.password_hash, "hash");
    assert!(store.find_user_by_login("bob").await.unwrap().is_none());
}
