use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// tracing 초기화
/// Initialize tracing
///
/// `RUST_LOG` 환경 변수로 필터를 지정하고, 없으면 "info" 레벨을 사용합니다.
/// 두 번 호출되면 (테스트 등) 두 번째 호출은 무시됩니다.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
