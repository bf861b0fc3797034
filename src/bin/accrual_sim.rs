use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use points_ledger::domains::simulator::create_simulator_router;
use points_ledger::shared::config::SimulatorArgs;
use points_ledger::shared::utils::init_tracing;

// Accrual 시스템 시뮬레이터
// 무작위 판정과 설정 가능한 429 비율로 accrual 시스템 계약을 흉내냅니다.
#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    init_tracing();

    let args = SimulatorArgs::parse();
    let app = create_simulator_router(args.throttle_percent);

    let listener = TcpListener::bind(&args.run_address)
        .await
        .with_context(|| format!("Failed to bind {}", args.run_address))?;

    info!(
        "Accrual simulator running on http://{} (throttle {}%)",
        args.run_address, args.throttle_percent
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("Simulator server failed")?;

    Ok(())
}
