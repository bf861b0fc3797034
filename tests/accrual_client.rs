// =====================================================
// Accrual 클라이언트 테스트 (가짜 accrual 시스템 대상)
// =====================================================

mod common;

use std::time::Duration;

use rust_decimal::Decimal;

use common::*;
use points_ledger::domains::reconciliation::AccrualStatus;
use points_ledger::shared::clients::AccrualClient;
use points_ledger::shared::errors::AccrualError;

#[tokio::test]
async fn decodes_processed_verdict() {
    let oracle = FakeOracle::start().await;
    let number = luhn_number(12345);
    oracle.script(&number, Scripted::processed(729.98));

    let verdict = oracle.client().fetch_verdict(&number).await.unwrap();
    assert_eq!(verdict.status, AccrualStatus::Processed);
    assert_eq!(verdict.accrual, Some(Decimal::new(72998, 2)));
}

#[tokio::test]
async fn rate_limit_carries_retry_after() {
    let oracle = FakeOracle::start().await;
    let number = luhn_number(1);
    oracle.script(&number, Scripted::RateLimited { retry_after: Some(60) });

    match oracle.client().fetch_verdict(&number).await {
        Err(AccrualError::RateLimited { retry_after }) => {
            assert_eq!(retry_after, Some(Duration::from_secs(60)))
        }
        other => panic!("expected rate limit, got {:?}", other),
    }

    oracle.script(&number, Scripted::RateLimited { retry_after: None });
    let err = oracle.client().fetch_verdict(&number).await.unwrap_err();
    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn maps_non_success_responses() {
    let oracle = FakeOracle::start().await;
    let client = oracle.client();

    let unknown = luhn_number(2);
    assert!(matches!(
        client.fetch_verdict(&unknown).await,
        Err(AccrualError::NotRegistered(_))
    ));

    let broken = luhn_number(3);
    oracle.script(&broken, Scripted::Status(500));
    assert!(matches!(
        client.fetch_verdict(&broken).await,
        Err(AccrualError::UnexpectedStatus { status: 500, .. })
    ));

    let garbled = luhn_number(4);
    oracle.script(&garbled, Scripted::Raw(r#"{"status":"DONE"}"#));
    assert!(matches!(
        client.fetch_verdict(&garbled).await,
        Err(AccrualError::Decode(_))
    ));

    let negative = luhn_number(5);
    oracle.script(
        &negative,
        Scripted::Verdict {
            status: "PROCESSED",
            accrual: Some(-1.5),
        },
    );
    assert!(matches!(
        client.fetch_verdict(&negative).await,
        Err(AccrualError::Decode(_))
    ));

    // 원장 컬럼 범위를 넘는 적립 포인트
    let oversized = luhn_number(7);
    oracle.script(&oversized, Scripted::processed(1e12));
    assert!(matches!(
        client.fetch_verdict(&oversized).await,
        Err(AccrualError::Decode(_))
    ));
}

#[tokio::test]
async fn unreachable_oracle_is_a_transport_error() {
    // 바인딩 후 바로 닫은 포트
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = AccrualClient::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap();
    assert!(matches!(
        client.fetch_verdict(&luhn_number(6)).await,
        Err(AccrualError::Transport(_))
    ));
}
