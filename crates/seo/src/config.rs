//! Configuration loaded from environment variables and the SEO YAML file.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::SeoableConfig;
use crate::settings::{LinkTagSetting, MetaTagSetting};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Public site URL, used to build absolute URLs.
    pub site_url: String,

    /// Environment name, used to pick environment-specific text files (default: production).
    pub app_env: String,

    /// Debug mode. Enables strict SEO value resolution.
    pub app_debug: bool,

    /// Site name, used for `og:site_name` (default: Trovato).
    pub app_name: String,

    /// Locale for generated text such as `og:image:alt` (default: en).
    pub app_locale: String,

    /// PostgreSQL connection URL. When None, settings come from the YAML file only.
    pub database_url: Option<String>,

    /// Maximum database connections in pool (default: 5).
    pub database_max_connections: u32,

    /// Path to the SEO YAML configuration (default: ./config/seo.yml).
    pub seo_config_path: PathBuf,

    /// Base directory for humans.txt, robots.txt and security.txt (default: .).
    pub base_path: PathBuf,

    /// Base URL of the media library (default: /media).
    pub media_url: String,

    /// Minify HTML responses (default: true).
    pub compress_html: bool,

    /// Lifetime of minified HTML in the cache (default: 3600).
    pub html_cache_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let site_url = env::var("SITE_URL").unwrap_or_else(|_| format!("http://localhost:{port}"));

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "production".to_string());

        let app_debug = parse_bool(env::var("APP_DEBUG").ok().as_deref(), false);

        let app_name = env::var("APP_NAME").unwrap_or_else(|_| "Trovato".to_string());

        let app_locale = env::var("APP_LOCALE")
            .unwrap_or_else(|_| "en".to_string())
            .to_lowercase();

        let database_url = env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let seo_config_path = env::var("SEO_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./config/seo.yml"));

        let base_path = env::var("BASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let media_url = env::var("MEDIA_URL").unwrap_or_else(|_| "/media".to_string());

        let compress_html = parse_bool(env::var("COMPRESS_HTML").ok().as_deref(), true);

        let html_cache_ttl_secs = env::var("HTML_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .context("HTML_CACHE_TTL_SECS must be a valid u64")?;

        Ok(Self {
            port,
            site_url,
            app_env,
            app_debug,
            app_name,
            app_locale,
            database_url,
            database_max_connections,
            seo_config_path,
            base_path,
            media_url,
            compress_html,
            html_cache_ttl_secs,
        })
    }
}

fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

/// Location of a well-known text file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFileConfig {
    /// File to read the contents from.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Literal contents. Takes priority over `path`.
    #[serde(default)]
    pub contents: Option<String>,
}

/// Dimensions applied to the social sharing image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialImageConfig {
    #[serde(default = "default_social_width")]
    pub default_width: u32,
    #[serde(default = "default_social_height")]
    pub default_height: u32,
}

fn default_social_width() -> u32 {
    1200
}

fn default_social_height() -> u32 {
    630
}

impl Default for SocialImageConfig {
    fn default() -> Self {
        Self {
            default_width: default_social_width(),
            default_height: default_social_height(),
        }
    }
}

/// SEO configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoConfig {
    /// Image used as `og:image` when a page sets none.
    #[serde(default)]
    pub default_social_image: Option<String>,

    #[serde(default)]
    pub social_image: SocialImageConfig,

    #[serde(default)]
    pub humans_txt: TextFileConfig,

    #[serde(default)]
    pub robots_txt: TextFileConfig,

    #[serde(default)]
    pub security_txt: TextFileConfig,

    /// Site-wide meta tags seeded into the settings.
    #[serde(default)]
    pub meta_tags: Vec<MetaTagSetting>,

    /// Site-wide link tags seeded into the settings.
    #[serde(default)]
    pub link_tags: Vec<LinkTagSetting>,

    /// Per-model resolver configuration keyed by model name.
    #[serde(default)]
    pub seoable_models: BTreeMap<String, SeoableConfig>,
}

impl SeoConfig {
    /// Load the YAML file at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "seo config not found, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        serde_yml::from_str(raw).context("invalid seo config")
    }

    /// Fill in unset text file paths with the environment-specific defaults.
    pub fn with_default_paths(mut self, base: &Path, app_env: &str) -> Self {
        for (file, entry) in [
            ("humans.txt", &mut self.humans_txt),
            ("robots.txt", &mut self.robots_txt),
            ("security.txt", &mut self.security_txt),
        ] {
            if entry.path.is_none() {
                entry.path = Some(resolve_text_path(base, app_env, file));
            }
        }
        self
    }

    /// The resolver configuration of a model. Unlisted models get the defaults.
    pub fn seoable_config(&self, model: &str) -> SeoableConfig {
        self.seoable_models.get(model).cloned().unwrap_or_default()
    }

    /// Text file configuration by settings key (`robots_txt`, ...).
    pub fn text_file(&self, key: &str) -> Option<&TextFileConfig> {
        match key {
            "humans_txt" => Some(&self.humans_txt),
            "robots_txt" => Some(&self.robots_txt),
            "security_txt" => Some(&self.security_txt),
            _ => None,
        }
    }
}

/// `{base}/{env}.{file}` when it exists, otherwise `{base}/{file}`.
pub fn resolve_text_path(base: &Path, app_env: &str, file: &str) -> PathBuf {
    let env_path = base.join(format!("{app_env}.{file}"));
    if env_path.exists() {
        env_path
    } else {
        base.join(file)
    }
}
