use std::net::SocketAddr;

use anyhow::Context;

use personal_ledger_api::app;
use personal_ledger_api::utils::{config::AppConfig, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = AppConfig::from_env().context("failed to load configuration")?;
    let _log_guard = logging::init_logging(&config.logging);

    if config.auth.test_mode {
        tracing::warn!("APP_TEST_MODE is on, API key authentication is disabled");
    }

    let addr = config.server.addr;
    let app = app::build_app(config).context("failed to build application")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {} failed", addr))?;
    tracing::info!("Axum listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("server failed")?;
    Ok(())
}
