//! Head tag endpoints.
//!
//! `POST /api/seo/head` resolves a record and a page into the final meta
//! and link tags. `GET /seo/preview` renders the site-wide head of a page
//! as an HTML document.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::Html,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::AppResult;
use crate::page::PageContext;
use crate::record::JsonRecord;
use crate::render::html_escape;
use crate::tags::{PageTags, SeoTags, TagEntry};
use crate::state::AppState;

/// Create the head tag router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/seo/head", post(resolve_head))
        .route("/seo/preview", get(preview))
}

/// A record and the page it is rendered on.
#[derive(Debug, Deserialize)]
pub struct HeadRequest {
    /// Model name, selects the resolver configuration.
    pub model: String,
    /// Record fields.
    #[serde(default)]
    pub record: Value,
    #[serde(default)]
    pub page: PageContext,
}

#[derive(Debug, Serialize)]
pub struct HeadResponse {
    /// The record's own tags, before page defaults.
    pub tags: SeoTags,
    pub meta: Vec<TagEntry>,
    pub link: Vec<TagEntry>,
    /// Rendered `<meta>` and `<link>` markup.
    pub html: String,
}

async fn resolve_head(
    State(state): State<AppState>,
    Json(request): Json<HeadRequest>,
) -> AppResult<Json<HeadResponse>> {
    let config = state.seo_config().seoable_config(&request.model);
    let record = JsonRecord::from_value(request.model.clone(), request.record)
        .storage_column(config.data_column.clone());
    config.validate(&record)?;

    let tags = state.resolver().resolve(&record, &config)?;

    let mut page_tags = PageTags::new();
    page_tags.apply_resolved(&tags);

    let mut page = request.page;
    if page.url.is_empty() {
        page.url = state.config().site_url.clone();
    }

    let meta = state
        .processor()
        .meta_tags(&mut page_tags, &page, state.settings());
    let link = state.processor().link_tags(&page_tags);
    let html = state.renderer().render(&page_tags)?;

    debug!(model = %request.model, url = %page.url, "resolved head tags");

    Ok(Json(HeadResponse {
        tags,
        meta,
        link,
        html,
    }))
}

#[derive(Debug, Deserialize)]
struct PreviewQuery {
    url: Option<String>,
    title: Option<String>,
}

async fn preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> AppResult<Html<String>> {
    let url = query
        .url
        .unwrap_or_else(|| state.config().site_url.clone());
    let title = query.title.unwrap_or_else(|| state.config().app_name.clone());

    let page = PageContext {
        title: Some(title.clone()),
        ..PageContext::new(url)
    };

    let mut page_tags = PageTags::new();
    state
        .processor()
        .process(&mut page_tags, &page, state.settings());
    let head = state.renderer().render(&page_tags)?;

    Ok(Html(format!(
        "<!DOCTYPE html>\n<html>\n  <head>\n    <title>{}</title>\n{head}  </head>\n  <body></body>\n</html>\n",
        html_escape(&title)
    )))
}
