pub mod demo_routes;
pub mod widget_routes;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::HostConfig;
use demo_routes::{demo_handler, index_handler};

#[derive(Clone)]
pub struct HostState {
    pub config: Arc<HostConfig>,
}

/// Full application router.
pub fn router(config: HostConfig) -> Router {
    let widget = widget_routes::router(&config.widget_dir);
    let state = HostState { config: Arc::new(config) };

    Router::new()
        .route("/", get(index_handler))
        .route("/demo", get(demo_handler))
        .merge(widget)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
