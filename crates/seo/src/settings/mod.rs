//! Site-wide SEO settings.
//!
//! Global meta and link tags that apply to every page, plus the contents of
//! the well-known text files.

pub mod store;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::config::{SeoConfig, TextFileConfig};

pub use store::SettingsStore;

/// A site-wide `<meta>` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaTagSetting {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A site-wide `<link>` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTagSetting {
    pub rel: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Key/value access to settings.
pub trait SettingsSource: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// A string setting. Missing, null and non-string values yield None.
    fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

/// The SEO settings record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoSettings {
    #[serde(default)]
    pub meta_tags: Vec<MetaTagSetting>,
    #[serde(default)]
    pub link_tags: Vec<LinkTagSetting>,
    #[serde(default)]
    pub humans_txt: String,
    #[serde(default)]
    pub robots_txt: String,
    #[serde(default)]
    pub security_txt: String,
}

impl SeoSettings {
    /// Seed settings from the configuration file.
    pub fn from_config(config: &SeoConfig) -> Self {
        Self {
            meta_tags: config.meta_tags.clone(),
            link_tags: config.link_tags.clone(),
            humans_txt: contents_from_config(&config.humans_txt),
            robots_txt: contents_from_config(&config.robots_txt),
            security_txt: contents_from_config(&config.security_txt),
        }
    }
}

/// Literal contents, else the file at `path`, else empty.
fn contents_from_config(entry: &TextFileConfig) -> String {
    if let Some(contents) = &entry.contents {
        return contents.clone();
    }
    entry
        .path
        .as_deref()
        .filter(|p| p.exists())
        .and_then(|p| match std::fs::read_to_string(p) {
            Ok(contents) => Some(contents),
            Err(e) => {
                warn!(path = %p.display(), error = %e, "failed to read text file");
                None
            }
        })
        .unwrap_or_default()
}

impl SettingsSource for SeoSettings {
    fn get(&self, key: &str) -> Option<Value> {
        match key {
            "meta_tags" => serde_json::to_value(&self.meta_tags).ok(),
            "link_tags" => serde_json::to_value(&self.link_tags).ok(),
            "humans_txt" => Some(Value::String(self.humans_txt.clone())),
            "robots_txt" => Some(Value::String(self.robots_txt.clone())),
            "security_txt" => Some(Value::String(self.security_txt.clone())),
            _ => None,
        }
    }
}
