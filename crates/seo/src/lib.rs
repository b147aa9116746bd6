//! Trovato SEO
//!
//! Resolves the meta and link tags of content records, fills in page-level
//! Open Graph defaults, serves the well-known text files and minifies HTML.
//!
//! The `trovato-seo` binary exposes these over HTTP; host applications can
//! also use the library directly through [`SeoResolver`] and
//! [`PageTagProcessor`].

pub mod compress;
pub mod config;
pub mod error;
pub mod lang;
pub mod middleware;
pub mod page;
pub mod record;
pub mod render;
pub mod resolver;
pub mod routes;
pub mod settings;
pub mod state;
pub mod tags;
pub mod value;

pub use config::{Config, SeoConfig};
pub use error::{AppError, AppResult, SeoError, SeoResult};
pub use page::{PageContext, PageTagProcessor};
pub use record::{JsonRecord, SeoableConfig, SeoableRecord};
pub use resolver::{ResolveMode, SeoResolver};
pub use settings::{SeoSettings, SettingsSource};
pub use state::AppState;
pub use tags::{PageTags, SeoTags, TagContainer, TagMap};
pub use value::{FileRef, SeoValue};
