//! HTTP route handlers.

pub mod head;
pub mod health;
pub mod text_files;

use axum::Router;
use axum::middleware::from_fn_with_state;
use tower_http::trace::TraceLayer;

use crate::middleware::minify_html;
use crate::state::AppState;

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(text_files::router())
        .merge(head::router())
        .layer(from_fn_with_state(state.clone(), minify_html))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
