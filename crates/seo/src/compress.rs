//! HTML minification and the minified page cache.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use moka::future::Cache;
use regex::Regex;
use tracing::debug;

/// Maximum number of cached pages.
const MAX_CACHED_PAGES: u64 = 10_000;

/// Rewrite rules, applied in order.
static RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        // Whitespace
        (r"\n(\S)", "${1}"),
        (r"\r", ""),
        (r"\n", ""),
        (r"\t", ""),
        (r" +", " "),
        (r"> +<", "><"),
        // Comments, keeping conditional comments
        (r"(?s)<!--[^\]><!\[](.*?)[^\]]-->", ""),
        // Scheme-relative URLs
        (r"https:", ""),
        (r"http:", ""),
        // Short attribute forms
        (r#" method=("get"|get)"#, ""),
        (r" disabled=[^ >]*(.*?)", " disabled"),
        (r" selected=[^ >]*(.*?)", " selected"),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| match Regex::new(pattern) {
        Ok(re) => Some((re, replacement)),
        Err(e) => {
            tracing::error!(pattern = %pattern, error = %e, "invalid minify rule");
            None
        }
    })
    .collect()
});

/// Minify an HTML document.
pub fn compress_html(html: &str) -> String {
    RULES.iter().fold(html.to_string(), |buffer, (re, replacement)| {
        re.replace_all(&buffer, *replacement).into_owned()
    })
}

/// Cache of minified pages keyed by request URI.
#[derive(Clone)]
pub struct HtmlCache {
    pages: Cache<String, Arc<String>>,
}

impl HtmlCache {
    pub fn new(ttl_secs: u64) -> Self {
        let pages = Cache::builder()
            .max_capacity(MAX_CACHED_PAGES)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();
        Self { pages }
    }

    /// Cache key for a request URI.
    pub fn key(uri: &str) -> String {
        format!("seo.minified{uri}")
    }

    pub async fn get(&self, uri: &str) -> Option<Arc<String>> {
        let hit = self.pages.get(&Self::key(uri)).await;
        if hit.is_some() {
            debug!(uri = %uri, "minified page cache hit");
        }
        hit
    }

    /// Minify `html` and store it for `uri`.
    pub async fn store(&self, uri: &str, html: &str) -> Arc<String> {
        let minified = Arc::new(compress_html(html));
        self.pages.insert(Self::key(uri), minified.clone()).await;
        minified
    }
}

impl std::fmt::Debug for HtmlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlCache")
            .field("entries", &self.pages.entry_count())
            .finish()
    }
}
