mod config;
mod errors;
mod routes;

use tracing::{info, warn};

use crate::config::HostConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialise tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mintobot_widget_host=debug,tower_http=debug".into()),
        )
        .init();

    // ── Configuration ─────────────────────────────────────────────────────────
    let config = HostConfig::from_env()?;
    if !config.widget_dir.is_dir() {
        warn!(
            "Widget bundle directory {} does not exist; build it with \
             `wasm-pack build frontend --target web --out-dir pkg`",
            config.widget_dir.display()
        );
    }
    let addr = config.addr();

    // ── Router ────────────────────────────────────────────────────────────────
    let app = routes::router(config);

    // ── Listen ────────────────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}/ (demo at /demo)");

    axum::serve(listener, app).await?;
    Ok(())
}
