use anyhow::Result;
use grid_dashboard::{api, app::AppState, config::Config, service, telemetry};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let cfg = Config::load()?;
    let data_service = service::from_config(&cfg)?;
    let state = AppState::new(cfg.clone(), data_service)?;

    state.initialize().await;

    let app = api::router(state.clone(), &cfg);
    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("server binding to 0.0.0.0 - dashboard API will be reachable from the network");
    }

    info!(%addr, provider = ?cfg.data_service.provider, "starting grid dashboard");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    state.shutdown();
    warn!("shutdown complete");
    Ok(())
}
