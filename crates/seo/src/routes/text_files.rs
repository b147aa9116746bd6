//! Well-known text files: humans.txt, robots.txt and security.txt.
//!
//! Contents come from the settings. When a setting is empty the file
//! configured for it is served instead.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Response, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use tokio::fs;
use tracing::warn;

use crate::settings::SettingsSource;
use crate::state::AppState;

/// Create the text files router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/humans.txt", get(humans_txt))
        .route("/robots.txt", get(robots_txt))
        .route("/security.txt", get(security_txt))
        .route("/.well-known/security.txt", get(security_txt))
}

async fn humans_txt(State(state): State<AppState>) -> Response<Body> {
    text_response(text_contents(&state, "humans_txt").await)
}

async fn robots_txt(State(state): State<AppState>) -> Response<Body> {
    text_response(text_contents(&state, "robots_txt").await)
}

async fn security_txt(State(state): State<AppState>) -> Response<Body> {
    text_response(text_contents(&state, "security_txt").await)
}

/// Contents of a text file setting, falling back to the configured file.
pub async fn text_contents(state: &AppState, key: &str) -> String {
    if let Some(contents) = state.settings().get_string(key).filter(|c| !c.is_empty()) {
        return contents;
    }

    let Some(path) = state
        .seo_config()
        .text_file(key)
        .and_then(|entry| entry.path.as_ref())
    else {
        return String::new();
    };

    match fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "failed to read text file");
            }
            String::new()
        }
    }
}

fn text_response(contents: String) -> Response<Body> {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        contents,
    )
        .into_response()
}
