//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::compress::HtmlCache;
use crate::config::{Config, SeoConfig};
use crate::lang::{Lang, Locale};
use crate::page::PageTagProcessor;
use crate::render::HeadRenderer;
use crate::resolver::SeoResolver;
use crate::settings::{SeoSettings, SettingsStore};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    seo_config: SeoConfig,
    settings: SeoSettings,
    /// Present when `DATABASE_URL` is configured.
    db: Option<PgPool>,
    html_cache: HtmlCache,
    resolver: SeoResolver,
    processor: PageTagProcessor,
    renderer: HeadRenderer,
}

impl AppState {
    /// Build the state: load the SEO config and, when a database is
    /// configured, the stored settings.
    pub async fn new(config: &Config) -> Result<Self> {
        let seo_config = SeoConfig::load(&config.seo_config_path)?
            .with_default_paths(&config.base_path, &config.app_env);

        let (db, settings) = match &config.database_url {
            Some(url) => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.database_max_connections)
                    .connect(url)
                    .await
                    .context("failed to connect to database")?;
                let store = SettingsStore::new(pool.clone());
                let settings = store.load(&seo_config).await?;
                if let Some(updated) = store.updated().await? {
                    info!(updated = %updated, "loaded seo settings from database");
                }
                (Some(pool), settings)
            }
            None => {
                info!("no database configured, using seo settings from configuration");
                (None, SeoSettings::from_config(&seo_config))
            }
        };

        Self::with_parts(config.clone(), seo_config, settings, db)
    }

    /// Build the state from already loaded parts.
    pub fn with_parts(
        config: Config,
        seo_config: SeoConfig,
        settings: SeoSettings,
        db: Option<PgPool>,
    ) -> Result<Self> {
        let processor = PageTagProcessor::new(&config.site_url, config.app_name.clone(), &seo_config)?
            .with_media_url(config.media_url.clone())
            .with_lang(Lang::new(Locale::from_code(&config.app_locale)));
        let renderer = HeadRenderer::new().context("failed to initialize head templates")?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                html_cache: HtmlCache::new(config.html_cache_ttl_secs),
                resolver: SeoResolver::from_debug(config.app_debug),
                config,
                seo_config,
                settings,
                db,
                processor,
                renderer,
            }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn seo_config(&self) -> &SeoConfig {
        &self.inner.seo_config
    }

    pub fn settings(&self) -> &SeoSettings {
        &self.inner.settings
    }

    pub fn db(&self) -> Option<&PgPool> {
        self.inner.db.as_ref()
    }

    pub fn html_cache(&self) -> &HtmlCache {
        &self.inner.html_cache
    }

    pub fn resolver(&self) -> &SeoResolver {
        &self.inner.resolver
    }

    pub fn processor(&self) -> &PageTagProcessor {
        &self.inner.processor
    }

    pub fn renderer(&self) -> &HeadRenderer {
        &self.inner.renderer
    }

    /// Check database connectivity. None when no database is configured.
    pub async fn postgres_healthy(&self) -> Option<bool> {
        let pool = self.db()?;
        Some(sqlx::query("SELECT 1").execute(pool).await.is_ok())
    }
}
