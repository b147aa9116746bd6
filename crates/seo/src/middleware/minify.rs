//! HTML minification middleware.
//!
//! Successful GET responses with an HTML content type are minified and
//! cached by request URI. Later requests for the same URI are answered
//! from the cache without running the handler.

use axum::{
    body::{Body, HttpBody},
    extract::State,
    http::{Method, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::state::AppState;

/// Largest response body that will be minified (8 MB).
const MAX_HTML_BYTES: usize = 8 * 1024 * 1024;

/// Middleware to minify and cache HTML pages.
pub async fn minify_html(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.config().compress_html || request.method() != Method::GET {
        return next.run(request).await;
    }

    let uri = request.uri().to_string();
    if let Some(html) = state.html_cache().get(&uri).await {
        return html_response(html.as_str().to_owned());
    }

    let response = next.run(request).await;
    if response.status() != StatusCode::OK || !is_html(&response) {
        return response;
    }

    let (mut parts, body) = response.into_parts();

    // Unknown or oversized bodies pass through untouched
    let fits = body
        .size_hint()
        .upper()
        .is_some_and(|len| len <= MAX_HTML_BYTES as u64);
    if !fits {
        debug!(uri = %uri, "html response too large to minify");
        return Response::from_parts(parts, body);
    }

    let bytes = match axum::body::to_bytes(body, MAX_HTML_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(uri = %uri, error = %e, "failed to buffer html response");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let Ok(html) = std::str::from_utf8(&bytes) else {
        warn!(uri = %uri, "html response is not valid utf-8, not minifying");
        return Response::from_parts(parts, Body::from(bytes));
    };
    let minified = state.html_cache().store(&uri, html).await;

    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(minified.as_str().to_owned()))
}

fn is_html(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/html"))
}

fn html_response(html: String) -> Response {
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
        .into_response()
}
