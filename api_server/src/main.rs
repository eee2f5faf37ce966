use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use patient_api::build_app;
use patient_api::shared::config::AppConfig;
use patient_api::shared::database::Database;
use patient_api::shared::logging::init_logging;
use patient_api::shared::services::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // 설정 로드 (.env 지원)
    let config = AppConfig::load()?;
    init_logging(config.log_format);
    if config.uses_dev_jwt_secret() {
        tracing::warn!("JWT_SECRET not set; falling back to the development secret");
    }

    // DB 연결
    let db = Database::new(&config.database).await?;
    db.initialize().await?;

    // AppState 생성 (모든 Service 초기화)
    let app_state = AppState::new(db, &config)?;

    // 만료 OTP 정리 스케줄러 시작
    let _cleanup_handle = app_state.otp_state.cleanup_scheduler.start();

    // CORS 설정
    let origin = config
        .cors_allowed_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", config.cors_allowed_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true);

    let app = build_app(app_state, cors);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(%addr, "server listening");
    tracing::info!("Swagger UI available at http://{}/api", addr);

    // 서버 실행 (Ctrl+C 시 graceful shutdown)
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
