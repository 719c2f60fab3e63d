//! Rides HTTP microservice entry point.
//!
//! # Configuration
//!
//! - `RIDES_DATABASE_PATH` - SQLite file (default: `:memory:`)
//! - `SERVICE_PORT` - HTTP port (default: 8010)
//! - `METRICS_ENABLED`, `METRICS_PATH` - Prometheus endpoint
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text

use tracing::{error, info, warn};

use rides_service_shared::{
    AppState, LoggingConfig, MetricsConfig, ServiceConfig, init_logging, init_metrics,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::from_env().with_service("rides"));

    let metrics_config = MetricsConfig::from_env();
    if metrics_config.enabled {
        if let Err(e) = init_metrics(&metrics_config) {
            warn!(error = %e, "failed to initialize metrics, continuing without metrics");
        }
    }

    let config = ServiceConfig::from_env();
    info!(
        database_path = %config.database_path.display(),
        port = config.port,
        "starting rides service"
    );

    let state = AppState::load(&config).map_err(|e| {
        error!(error = %e, path = %config.database_path.display(), "failed to load application state");
        e
    })?;

    let app = rides_service::app(state, &metrics_config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "App started and listening on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("rides service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
