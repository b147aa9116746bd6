//! Postgres persistence for SEO settings.
//!
//! Settings live as a single JSON value in the `site_config` table under the
//! `seo_settings` key.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use super::SeoSettings;
use crate::config::SeoConfig;

/// `site_config` key holding the settings.
pub const SETTINGS_KEY: &str = "seo_settings";

/// Loads and saves [`SeoSettings`].
#[derive(Clone)]
pub struct SettingsStore {
    pool: PgPool,
}

impl SettingsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load the stored settings, seeding them from `config` on first use.
    pub async fn load(&self, config: &SeoConfig) -> Result<SeoSettings> {
        let stored = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT value FROM site_config WHERE key = $1",
        )
        .bind(SETTINGS_KEY)
        .fetch_optional(&self.pool)
        .await
        .context("failed to get seo settings")?;

        match stored {
            Some(value) => serde_json::from_value(value).context("invalid stored seo settings"),
            None => {
                let settings = SeoSettings::from_config(config);
                self.save(&settings).await?;
                info!("seeded seo settings from configuration");
                Ok(settings)
            }
        }
    }

    /// Store the settings, replacing any previous value.
    pub async fn save(&self, settings: &SeoSettings) -> Result<()> {
        let value = serde_json::to_value(settings).context("failed to encode seo settings")?;

        sqlx::query(
            r#"
            INSERT INTO site_config (key, value, updated)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE SET value = $2, updated = NOW()
            "#,
        )
        .bind(SETTINGS_KEY)
        .bind(value)
        .execute(&self.pool)
        .await
        .context("failed to set seo settings")?;

        Ok(())
    }

    /// When the settings were last saved.
    pub async fn updated(&self) -> Result<Option<chrono::DateTime<chrono::Utc>>> {
        sqlx::query_scalar::<_, chrono::DateTime<chrono::Utc>>(
            "SELECT updated FROM site_config WHERE key = $1",
        )
        .bind(SETTINGS_KEY)
        .fetch_optional(&self.pool)
        .await
        .context("failed to get seo settings timestamp")
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("pool", &"PgPool")
            .finish()
    }
}
