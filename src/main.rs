use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use points_ledger::domains::auth::models::{Credentials, TokenResponse};
use points_ledger::domains::auth::services::JwtService;
use points_ledger::domains::ledger::models::{Balance, Order, OrderStatus, WithdrawRequest, Withdrawal};
use points_ledger::domains::reconciliation::ReconciliationLoop;
use points_ledger::routes::create_app;
use points_ledger::shared::clients::AccrualClient;
use points_ledger::shared::config::{mask_dsn, Config};
use points_ledger::shared::database::{Database, LedgerStore, MemoryStore, PgStore, UserStore};
use points_ledger::shared::services::AppState;
use points_ledger::shared::utils::init_tracing;

// OpenAPI 스키마 정의: Swagger 문서 자동 생성
#[derive(OpenApi)]
#[openapi(
    paths(
        points_ledger::domains::auth::handlers::auth_handler::register,
        points_ledger::domains::auth::handlers::auth_handler::login,
        points_ledger::domains::ledger::handlers::order_handler::submit_order,
        points_ledger::domains::ledger::handlers::order_handler::list_orders,
        points_ledger::domains::ledger::handlers::balance_handler::get_balance,
        points_ledger::domains::ledger::handlers::balance_handler::withdraw,
        points_ledger::domains::ledger::handlers::balance_handler::list_withdrawals
    ),
    components(schemas(
        Credentials,
        TokenResponse,
        Order,
        OrderStatus,
        Balance,
        WithdrawRequest,
        Withdrawal
    )),
    modifiers(
        &SecurityAddon
    ),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Orders", description = "Order upload and listing"),
        (name = "Balance", description = "Points balance and withdrawals")
    ),
    info(
        title = "Points Ledger API",
        description = "Loyalty points ledger with accrual reconciliation",
        version = "1.0.0"
    )
)]
struct ApiDoc;

// Security scheme 정의: Swagger UI에서 "Authorize" 버튼 추가
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    // 설정 로드 (플래그 > 환경 변수 > 기본값)
    let config = Config::load().context("Invalid configuration")?;

    // 저장소 선택: PostgreSQL 연결 실패는 치명적
    let (ledger_store, user_store, database): (Arc<dyn LedgerStore>, Arc<dyn UserStore>, Option<Database>) =
        match config.database_uri.as_deref() {
            Some(uri) if !config.in_memory => {
                info!("Database: {}", mask_dsn(uri));
                let db = Database::new(uri).await?;
                db.initialize().await?;
                let store = PgStore::new(db.clone());
                (Arc::new(store.clone()), Arc::new(store), Some(db))
            }
            _ => {
                warn!("Using in-memory store; data is lost on shutdown");
                let store = MemoryStore::new();
                (Arc::new(store.clone()), Arc::new(store), None)
            }
        };

    // 조정 루프 시작 (첫 틱은 즉시 실행)
    let accrual_client = AccrualClient::new(&config.accrual_address, config.accrual_timeout)?;
    let reconciliation = ReconciliationLoop::new(ledger_store.clone(), accrual_client, config.accrual_delay);
    let cancel = reconciliation.cancellation_token();
    let reconciliation_handle = reconciliation.spawn();

    // AppState 생성
    let jwt_service = JwtService::new(&config.jwt_secret, config.token_ttl);
    let app_state = AppState::new(ledger_store, user_store, jwt_service);

    let app = Router::new()
        .merge(create_app(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = TcpListener::bind(&config.run_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.run_address))?;

    info!("Server running on http://{}", config.run_address);
    info!("Swagger UI available at http://{}/swagger-ui", config.run_address);
    info!("Accrual system: {} (every {:?})", config.accrual_address, config.accrual_delay);

    // 서버 실행 (SIGINT/SIGTERM 시 요청 처리 후 종료)
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    // 조정 루프 정지 후 대기
    info!("Shutting down reconciliation loop");
    cancel.cancel();
    if let Err(e) = reconciliation_handle.await {
        warn!("Reconciliation loop task failed: {}", e);
    }

    if let Some(db) = database {
        db.close().await;
    }

    info!("Shutdown complete");
    Ok(())
}

// 종료 신호 대기 (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
