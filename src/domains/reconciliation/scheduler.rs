use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domains::ledger::models::{OrderNumber, OrderStatus};
use crate::domains::reconciliation::models::{AccrualStatus, AccrualVerdict, TickReport};
use crate::shared::clients::AccrualClient;
use crate::shared::database::LedgerStore;
use crate::shared::errors::{AccrualError, LedgerError};

/// 주문 판정 조정 루프
/// Order reconciliation loop
///
/// 역할:
/// - 일정 주기마다 판정 대기 중인 주문(NEW, PROCESSING)을 조회
/// - 주문마다 accrual 시스템에 판정을 질의하고 결과를 원장에 기록
/// - 429를 받으면 현재 틱의 나머지 주문은 다음 틱으로 미룸
///
/// 처리 흐름:
/// 1. 시작 즉시 첫 틱 실행 (재시작 시 밀린 주문을 바로 처리)
/// 2. 이후 `interval`마다 틱 실행
/// 3. 취소 토큰이 취소되면 새 틱을 시작하지 않고,
///    진행 중인 틱은 다음 주문으로 넘어가기 전에 멈춤
///
/// 틱 사이에 유지하는 상태는 스케줄뿐입니다.
pub struct ReconciliationLoop {
    store: Arc<dyn LedgerStore>,
    client: AccrualClient,
    interval: Duration,
    cancel: CancellationToken,
}

/// 판정 하나를 원장에 반영한 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applied {
    Processed,
    Invalid,
    Progressed,
    Unchanged,
}

impl ReconciliationLoop {
    /// 새 루프 생성
    /// Create a new loop
    pub fn new(store: Arc<dyn LedgerStore>, client: AccrualClient, interval: Duration) -> Self {
        Self {
            store,
            client,
            interval,
            cancel: CancellationToken::new(),
        }
    }

    /// 루프를 멈추는 데 쓰는 토큰
    /// Token that stops the loop when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 루프 실행 (취소될 때까지)
    /// Run until the cancellation token fires
    pub async fn run(&self) {
        info!(
            "Reconciliation loop started (interval {:?}, accrual system {})",
            self.interval,
            self.client.base_url()
        );

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }

        info!("Reconciliation loop stopped");
    }

    /// 백그라운드 태스크로 실행
    /// Run on a background task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    /// 틱 한 번 실행
    /// Run one reconciliation pass over all pending orders
    ///
    /// 주문은 업로드 순서대로 하나씩 처리하며, 한 틱에서 같은 주문을 두 번 질의하지 않습니다.
    pub async fn tick(&self) -> TickReport {
        let mut report = TickReport::default();

        let pending = match self.store.list_pending_orders().await {
            Ok(pending) => pending,
            Err(e) => {
                warn!("Failed to list pending orders: {}", e);
                return report;
            }
        };
        report.pending = pending.len();

        for number in &pending {
            if self.cancel.is_cancelled() {
                debug!("Reconciliation tick cancelled before order {}", number);
                break;
            }

            let verdict = match self.client.fetch_verdict(number).await {
                Ok(verdict) => verdict,
                Err(AccrualError::RateLimited { retry_after }) => {
                    warn!(
                        "Accrual system is rate limiting (retry after {:?}); deferring remaining orders to the next tick",
                        retry_after
                    );
                    report.rate_limited = true;
                    break;
                }
                Err(AccrualError::NotRegistered(_)) => {
                    debug!("Order {} is not registered in the accrual system yet", number);
                    report.unchanged += 1;
                    continue;
                }
                Err(e) => {
                    warn!("Failed to fetch verdict for order {}: {}", number, e);
                    report.failed += 1;
                    continue;
                }
            };

            match self.apply_verdict(number, &verdict).await {
                Ok(Applied::Processed) => report.processed += 1,
                Ok(Applied::Invalid) => report.invalid += 1,
                Ok(Applied::Progressed) => report.progressed += 1,
                Ok(Applied::Unchanged) => report.unchanged += 1,
                Err(e) => {
                    warn!("Failed to apply verdict for order {}: {}", number, e);
                    report.failed += 1;
                }
            }
        }

        if report.pending > 0 {
            info!(
                pending = report.pending,
                processed = report.processed,
                invalid = report.invalid,
                progressed = report.progressed,
                unchanged = report.unchanged,
                failed = report.failed,
                rate_limited = report.rate_limited,
                "Reconciliation tick finished"
            );
        }

        report
    }

    // 판정을 원장에 기록
    // PROCESSED는 상태와 적립 포인트를 한 번의 쓰기로 기록합니다.
    async fn apply_verdict(
        &self,
        number: &OrderNumber,
        verdict: &AccrualVerdict,
    ) -> Result<Applied, LedgerError> {
        match verdict.status {
            AccrualStatus::Processed => {
                let accrual = verdict.accrual.unwrap_or(Decimal::ZERO);
                let affected = self.store.complete_order(number, accrual).await?;
                Ok(self.terminal_outcome(number, OrderStatus::Processed, affected, Applied::Processed))
            }
            AccrualStatus::Invalid => {
                let affected = self.store.set_order_status(number, OrderStatus::Invalid).await?;
                Ok(self.terminal_outcome(number, OrderStatus::Invalid, affected, Applied::Invalid))
            }
            AccrualStatus::Processing => {
                let affected = self
                    .store
                    .set_order_status(number, OrderStatus::Processing)
                    .await?;
                if affected == 1 {
                    Ok(Applied::Progressed)
                } else {
                    debug!("Order {} is already PROCESSING", number);
                    Ok(Applied::Unchanged)
                }
            }
            AccrualStatus::Registered => Ok(Applied::Unchanged),
        }
    }

    fn terminal_outcome(
        &self,
        number: &OrderNumber,
        status: OrderStatus,
        affected: u64,
        applied: Applied,
    ) -> Applied {
        if affected == 1 {
            debug!("Order {} is now {}", number, status);
            applied
        } else {
            warn!(
                "Status write {} for order {} affected {} rows; re-evaluating next tick",
                status, number, affected
            );
            Applied::Unchanged
        }
    }
}
