//! Page tag processing.
//!
//! Fills the meta and link containers of a page render with sensible
//! defaults: canonical URL, Open Graph and Twitter card tags, and the
//! site-wide tags from the settings. A tag that is already set is never
//! overwritten.

pub mod image;

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::config::{SeoConfig, SocialImageConfig};
use crate::lang::Lang;
use crate::settings::{LinkTagSetting, MetaTagSetting, SettingsSource};
use crate::tags::{PageTags, TagContainer, TagEntry};

pub use image::{ImageResizer, QueryStringResizer, ResizeMode, mime_from_path};

/// Page properties that feed the default tags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageContext {
    /// URL of the current request.
    pub url: String,
    pub title: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    /// Media library path of the page image.
    pub meta_image: Option<String>,
    pub meta_nofollow: bool,
    pub paginate_prev: Option<String>,
    pub paginate_next: Option<String>,
}

impl PageContext {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Applies the default tag rules to a page.
#[derive(Clone)]
pub struct PageTagProcessor {
    site_url: Url,
    app_name: String,
    media_url: String,
    default_social_image: Option<String>,
    social_image: SocialImageConfig,
    lang: Lang,
    resizer: Arc<dyn ImageResizer>,
}

impl PageTagProcessor {
    pub fn new(site_url: &str, app_name: impl Into<String>, config: &SeoConfig) -> Result<Self> {
        let site_url = Url::parse(site_url).with_context(|| format!("invalid site url: {site_url}"))?;
        Ok(Self {
            site_url,
            app_name: app_name.into(),
            media_url: "/media".to_string(),
            default_social_image: config.default_social_image.clone(),
            social_image: config.social_image,
            lang: Lang::default(),
            resizer: Arc::new(QueryStringResizer),
        })
    }

    pub fn with_lang(mut self, lang: Lang) -> Self {
        self.lang = lang;
        self
    }

    pub fn with_media_url(mut self, media_url: impl Into<String>) -> Self {
        self.media_url = media_url.into();
        self
    }

    pub fn with_resizer(mut self, resizer: Arc<dyn ImageResizer>) -> Self {
        self.resizer = resizer;
        self
    }

    /// Run every rule against `tags`.
    pub fn process(&self, tags: &mut PageTags, page: &PageContext, settings: &dyn SettingsSource) {
        self.process_page_meta(tags, page);
        self.process_settings(tags, settings);
        self.process_og_image(&mut tags.meta, page);
        process_description(&mut tags.meta);
        self.process_og_url(tags, page);
        if tags.meta.is_empty_tag("og:type") {
            tags.meta.set("og:type", "website");
        }
        if tags.meta.is_empty_tag("og:site_name") {
            tags.meta.set("og:site_name", self.app_name.clone());
        }
    }

    /// Process the page and return the meta tags.
    pub fn meta_tags(
        &self,
        tags: &mut PageTags,
        page: &PageContext,
        settings: &dyn SettingsSource,
    ) -> Vec<TagEntry> {
        self.process(tags, page, settings);
        tags.meta.all().to_vec()
    }

    pub fn link_tags(&self, tags: &PageTags) -> Vec<TagEntry> {
        tags.link.all().to_vec()
    }

    fn process_page_meta(&self, tags: &mut PageTags, page: &PageContext) {
        if tags.link.is_empty_tag("canonical") {
            tags.link.set("canonical", page.url.clone());
        }

        if page.meta_nofollow {
            tags.link.set("robots", "nofollow");
        }

        let meta_image = non_empty(page.meta_image.as_deref()).map(|p| self.media_library_url(p));
        let meta_map = [
            ("og:title", non_empty(page.meta_title.as_deref()).map(str::to_string)),
            (
                "og:description",
                non_empty(page.meta_description.as_deref()).map(str::to_string),
            ),
            ("og:image", meta_image),
        ];
        set_if_empty(&mut tags.meta, meta_map);

        let link_map = [
            ("prev", non_empty(page.paginate_prev.as_deref()).map(str::to_string)),
            ("next", non_empty(page.paginate_next.as_deref()).map(str::to_string)),
        ];
        set_if_empty(&mut tags.link, link_map);
    }

    /// Site-wide tags fill whatever the record and page left unset.
    fn process_settings(&self, tags: &mut PageTags, settings: &dyn SettingsSource) {
        let meta_tags: Vec<MetaTagSetting> = settings_list(settings, "meta_tags");
        for tag in meta_tags {
            if tags.meta.is_empty_tag(&tag.name) {
                tags.meta.set(&tag.name, tag.value);
            }
        }

        let link_tags: Vec<LinkTagSetting> = settings_list(settings, "link_tags");
        for tag in link_tags {
            if tags.link.is_empty_tag(&tag.rel) {
                tags.link.set(&tag.rel, tag.href);
            }
        }
    }

    fn process_og_image(&self, meta: &mut TagContainer, page: &PageContext) {
        let image = non_empty(meta.get("og:image"))
            .map(str::to_string)
            .or_else(|| self.default_social_image.clone());
        let Some(image) = image else {
            return;
        };

        if meta.is_empty_tag("twitter:card") {
            meta.set("twitter:card", "summary_large_image");
        }

        let mut image_url = image.clone();
        if meta.is_empty_tag("og:image:width") || meta.is_empty_tag("og:image:height") {
            let width = self.social_image.default_width;
            let height = self.social_image.default_height;
            meta.set("og:image:width", width.to_string());
            meta.set("og:image:height", height.to_string());

            image_url = self.absolute_url(&self.resizer.resized_url(
                &image,
                width,
                height,
                ResizeMode::Crop,
            ));
            meta.set("og:image", image_url.clone());
        }

        if meta.is_empty_tag("og:image:type") {
            if let Some(mime) = mime_from_path(&self.url_path(&image_url)) {
                meta.set("og:image:type", mime);
            }
        }

        if meta.is_empty_tag("og:image:alt") {
            let title = meta
                .get("og:title")
                .or_else(|| meta.get("title"))
                .or(page.title.as_deref())
                .unwrap_or_default()
                .to_string();
            let alt = self.lang.get(
                "meta.og:image:alt",
                &[("title", title.as_str()), ("app_name", self.app_name.as_str())],
            );
            meta.set("og:image:alt", alt);
        }
    }

    fn process_og_url(&self, tags: &mut PageTags, page: &PageContext) {
        if tags.meta.is_empty_tag("og:url") {
            let url = tags
                .link
                .get("canonical")
                .unwrap_or(page.url.as_str())
                .to_string();
            tags.meta.set("og:url", url);
        }
    }

    /// Resolve `path` against the site URL. Absolute URLs pass through.
    pub fn absolute_url(&self, path: &str) -> String {
        if Url::parse(path).is_ok() {
            return path.to_string();
        }
        match self.site_url.join(path) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!(path = %path, error = %e, "failed to build absolute url");
                path.to_string()
            }
        }
    }

    /// Public URL of a media library path.
    pub fn media_library_url(&self, path: &str) -> String {
        if Url::parse(path).is_ok() {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.media_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// The path component of a URL, without query or fragment.
    fn url_path(&self, url: &str) -> String {
        match Url::parse(url) {
            Ok(parsed) => parsed.path().to_string(),
            Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
        }
    }
}

impl std::fmt::Debug for PageTagProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageTagProcessor")
            .field("site_url", &self.site_url.as_str())
            .field("app_name", &self.app_name)
            .field("media_url", &self.media_url)
            .field("default_social_image", &self.default_social_image)
            .finish_non_exhaustive()
    }
}

/// Copy `description` into `og:description` or the reverse, whichever is missing.
fn process_description(meta: &mut TagContainer) {
    let description = non_empty(meta.get("description")).map(str::to_string);
    let og_description = non_empty(meta.get("og:description")).map(str::to_string);
    match (description, og_description) {
        (Some(d), None) => meta.set("og:description", d),
        (None, Some(d)) => meta.set("description", d),
        _ => {}
    }
}

fn set_if_empty<const N: usize>(container: &mut TagContainer, map: [(&str, Option<String>); N]) {
    for (name, value) in map {
        if let Some(value) = value.filter(|_| container.is_empty_tag(name)) {
            container.set(name, value);
        }
    }
}

fn settings_list<T: serde::de::DeserializeOwned>(settings: &dyn SettingsSource, key: &str) -> Vec<T> {
    let Some(value) = settings.get(key) else {
        return Vec::new();
    };
    match serde_json::from_value(value) {
        Ok(list) => list,
        Err(e) => {
            warn!(key = %key, error = %e, "ignoring malformed settings list");
            Vec::new()
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::lang::Locale;
    use crate::settings::SeoSettings;

    fn processor(config: &SeoConfig) -> PageTagProcessor {
        PageTagProcessor::new("https://example.com", "Trovato", config).unwrap()
    }

    #[test]
    fn bare_page_gets_website_defaults() {
        let mut tags = PageTags::new();
        let page = PageContext::new("https://example.com/about");
        processor(&SeoConfig::default()).process(&mut tags, &page, &SeoSettings::default());

        assert_eq!(tags.link.get("canonical"), Some("https://example.com/about"));
        assert_eq!(tags.meta.get("og:url"), Some("https://example.com/about"));
        assert_eq!(tags.meta.get("og:type"), Some("website"));
        assert_eq!(tags.meta.get("og:site_name"), Some("Trovato"));
        assert_eq!(tags.meta.get("twitter:card"), None);
    }

    #[test]
    fn existing_canonical_drives_og_url() {
        let mut tags = PageTags::new();
        tags.link.set("canonical", "https://example.com/canonical");
        let page = PageContext::new("https://example.com/about?page=2");
        processor(&SeoConfig::default()).process(&mut tags, &page, &SeoSettings::default());

        assert_eq!(tags.meta.get("og:url"), Some("https://example.com/canonical"));
    }

    #[test]
    fn page_meta_fills_open_graph() {
        let mut tags = PageTags::new();
        tags.meta.set("og:title", "From record");
        let page = PageContext {
            meta_title: Some("From page".to_string()),
            meta_description: Some("About us".to_string()),
            meta_nofollow: true,
            paginate_next: Some("/about?page=2".to_string()),
            ..PageContext::new("https://example.com/about")
        };
        processor(&SeoConfig::default()).process(&mut tags, &page, &SeoSettings::default());

        assert_eq!(tags.meta.get("og:title"), Some("From record"));
        assert_eq!(tags.meta.get("og:description"), Some("About us"));
        assert_eq!(tags.meta.get("description"), Some("About us"));
        assert_eq!(tags.link.get("robots"), Some("nofollow"));
        assert_eq!(tags.link.get("next"), Some("/about?page=2"));
        assert_eq!(tags.link.get("prev"), None);
    }

    #[test]
    fn description_copies_to_og_description() {
        let mut meta = TagContainer::new();
        meta.set("description", "Plain");
        process_description(&mut meta);
        assert_eq!(meta.get("og:description"), Some("Plain"));
    }

    #[test]
    fn og_image_is_resized_and_typed() {
        let mut tags = PageTags::new();
        let page = PageContext {
            meta_title: Some("Launch".to_string()),
            meta_image: Some("banners/launch.png".to_string()),
            ..PageContext::new("https://example.com/launch")
        };
        processor(&SeoConfig::default()).process(&mut tags, &page, &SeoSettings::default());

        assert_eq!(
            tags.meta.get("og:image"),
            Some("https://example.com/media/banners/launch.png?width=1200&height=630&mode=crop")
        );
        assert_eq!(tags.meta.get("og:image:width"), Some("1200"));
        assert_eq!(tags.meta.get("og:image:height"), Some("630"));
        assert_eq!(tags.meta.get("og:image:type"), Some("image/png"));
        assert_eq!(tags.meta.get("twitter:card"), Some("summary_large_image"));
        assert_eq!(
            tags.meta.get("og:image:alt"),
            Some("Social image for Launch on Trovato")
        );
    }

    #[test]
    fn explicit_dimensions_keep_image_untouched() {
        let mut tags = PageTags::new();
        tags.meta.set("og:image", "https://cdn.example.com/a.jpg");
        tags.meta.set("og:image:width", "800");
        tags.meta.set("og:image:height", "600");
        let page = PageContext::new("https://example.com/");
        processor(&SeoConfig::default()).process(&mut tags, &page, &SeoSettings::default());

        assert_eq!(tags.meta.get("og:image"), Some("https://cdn.example.com/a.jpg"));
        assert_eq!(tags.meta.get("og:image:width"), Some("800"));
        assert_eq!(tags.meta.get("og:image:type"), Some("image/jpeg"));
    }

    #[test]
    fn default_social_image_and_french_alt() {
        let config = SeoConfig {
            default_social_image: Some("/static/share.jpg".to_string()),
            ..SeoConfig::default()
        };
        let mut tags = PageTags::new();
        let page = PageContext {
            title: Some("Accueil".to_string()),
            ..PageContext::new("https://example.com/")
        };
        processor(&config)
            .with_lang(Lang::new(Locale::Fr))
            .process(&mut tags, &page, &SeoSettings::default());

        assert_eq!(
            tags.meta.get("og:image"),
            Some("https://example.com/static/share.jpg?width=1200&height=630&mode=crop")
        );
        assert_eq!(
            tags.meta.get("og:image:alt"),
            Some("Image sociale pour Accueil sur Trovato")
        );
    }

    #[test]
    fn settings_fill_only_missing_tags() {
        let settings = SeoSettings {
            meta_tags: vec![
                MetaTagSetting {
                    name: "author".to_string(),
                    value: "Trovato Team".to_string(),
                    description: None,
                },
                MetaTagSetting {
                    name: "og:type".to_string(),
                    value: "website".to_string(),
                    description: None,
                },
            ],
            link_tags: vec![LinkTagSetting {
                rel: "me".to_string(),
                href: "https://example.social/@trovato".to_string(),
                description: None,
            }],
            ..SeoSettings::default()
        };
        let mut tags = PageTags::new();
        tags.meta.set("og:type", "article");
        processor(&SeoConfig::default()).process(
            &mut tags,
            &PageContext::new("https://example.com/"),
            &settings,
        );

        assert_eq!(tags.meta.get("author"), Some("Trovato Team"));
        assert_eq!(tags.meta.get("og:type"), Some("article"));
        assert_eq!(tags.link.get("me"), Some("https://example.social/@trovato"));
    }

    #[test]
    fn media_library_url_keeps_absolute_urls() {
        let p = processor(&SeoConfig::default()).with_media_url("/storage/media/");
        assert_eq!(p.media_library_url("a/b.jpg"), "/storage/media/a/b.jpg");
        assert_eq!(
            p.media_library_url("https://cdn.example.com/b.jpg"),
            "https://cdn.example.com/b.jpg"
        );
    }

    #[test]
    fn invalid_site_url_is_rejected() {
        assert!(PageTagProcessor::new("not a url", "Trovato", &SeoConfig::default()).is_err());
    }
}
