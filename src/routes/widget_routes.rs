use std::path::Path;

use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::routes::HostState;

/// The embed loader served at `/widget/chat.js`.
pub const LOADER_JS: &str = include_str!("../../static/loader.js");

const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

/// GET `/widget/chat.js` — loader script for embedding pages
pub async fn loader_handler() -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/javascript; charset=utf-8")], LOADER_JS)
}

/// Widget assets: the loader plus the wasm-bindgen bundle under
/// `/widget/pkg/`. Embedded on foreign origins, so every response allows
/// any origin and is never cached.
pub fn router(widget_dir: &Path) -> Router<HostState> {
    Router::new()
        .route("/widget/chat.js", get(loader_handler))
        .nest_service("/widget/pkg", ServeDir::new(widget_dir))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(NO_CACHE),
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::HEAD]),
        )
}
