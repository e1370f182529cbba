//! faultgate HTTP Server
//!
//! Main entry point for the fault control server.

use std::time::Duration;

use infrastructure::{AppConfig, init_logging};
use presentation_http::{routes, serve_with_shutdown, shutdown_signal, state::AppState};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before logging so the format and filter apply
    let loaded = AppConfig::load();
    let config = loaded.as_ref().map_or_else(|_| AppConfig::default(), Clone::clone);

    init_logging(&config.logging)?;
    if let Err(e) = &loaded {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    info!("faultgate v{} starting...", env!("CARGO_PKG_VERSION"));

    let injector = config.build_injector();
    info!(
        host = %config.server.host,
        port = config.server.port,
        environment = %injector.environment(),
        production = injector.is_production(),
        "Configuration loaded"
    );

    // Install start-up rules
    let spec = config.startup_spec()?;
    if !spec.is_empty() {
        if injector.is_production() {
            warn!("Start-up fault spec ignored in production-like environment");
        }
        spec.apply(&injector);
    }

    let app = routes::create_router(AppState::new(injector)).layer(TraceLayer::new_for_http());

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Control server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    let outcome =
        serve_with_shutdown(listener, app, shutdown_signal(), shutdown_timeout).await?;

    info!(?outcome, "Server shutdown complete");

    Ok(())
}
