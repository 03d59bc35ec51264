use crate::middleware_impls::request_id_middleware;
use axum::middleware;
use axum::routing::get;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::health;
use super::url_handlers;
use super::AppState;

/// Create application router
///
/// `/s` and `/_health` are static segments and win over `/{slug}`.
/// Everything else, including `/`, goes to the fallback redirect.
pub fn create_router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route("/s", get(url_handlers::shorten_url))
        .route("/_health", get(health::health_check))
        .route("/{slug}", get(url_handlers::resolve_slug))
        .route("/", get(url_handlers::fallback))
        .fallback(url_handlers::fallback)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id_middleware)),
        )
        .with_state(state)
}
