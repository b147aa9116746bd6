//! SEO attribute resolver.
//!
//! Merges the SEO data stored on a record with values resolved from the
//! record's attributes, relations and methods. Stored data always wins.
//!
//! For every `(name, source)` pair of a mapping the source is looked up as,
//! in order: an attribute, a relation, a method. The first capability that
//! reports the member wins, even when its value is null. When none does the
//! source string itself is used as a literal value.

use serde_json::Value;
use tracing::{debug, error};

use crate::error::{SeoError, SeoResult};
use crate::record::{SEO_DATA_KEY, SeoableConfig, SeoableRecord};
use crate::tags::{SeoTags, TagMap, TagType};
use crate::value::SeoValue;

/// How type mismatches are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// Abort resolution of the whole record.
    Strict,
    /// Log the mismatch and resolve the tag to null.
    #[default]
    Lenient,
}

/// Resolves the SEO tag set of a record.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeoResolver {
    mode: ResolveMode,
}

impl SeoResolver {
    pub fn new(mode: ResolveMode) -> Self {
        Self { mode }
    }

    /// Strict in debug environments, lenient otherwise.
    pub fn from_debug(debug: bool) -> Self {
        Self::new(if debug {
            ResolveMode::Strict
        } else {
            ResolveMode::Lenient
        })
    }

    pub fn mode(&self) -> ResolveMode {
        self.mode
    }

    /// Resolve the full tag set of a record.
    pub fn resolve<R: SeoableRecord + ?Sized>(
        &self,
        record: &R,
        config: &SeoableConfig,
    ) -> SeoResult<SeoTags> {
        let seo_data = record
            .json_column(&config.data_column)
            .and_then(|column| column.get(SEO_DATA_KEY));

        let mut tags = SeoTags::default();
        for tag_type in TagType::ALL {
            let stored = stored_tags(record, seo_data, tag_type);
            let mut values = TagMap::new();

            for (name, source) in config.sources(tag_type).iter() {
                let value = match stored.get(name) {
                    Some(stored_value) => stored_value.clone(),
                    None => self.resolve_value(record, name, source)?,
                };
                values.insert(name, value);
            }

            // Stored entries win; stored-only keys are appended
            for (name, value) in stored {
                values.insert(name, value);
            }

            *tags.of_type_mut(tag_type) = values;
        }

        debug!(
            model = %record.model_name(),
            meta = tags.meta.len(),
            link = tags.link.len(),
            "resolved seo tags"
        );

        Ok(tags)
    }

    /// Resolve a single mapping source for the tag `key`.
    pub fn resolve_value<R: SeoableRecord + ?Sized>(
        &self,
        record: &R,
        key: &str,
        source: &str,
    ) -> SeoResult<Option<String>> {
        let value = record
            .attribute(source)
            .or_else(|| record.relation(source))
            .or_else(|| record.call_method(source))
            .unwrap_or_else(|| SeoValue::from(source));

        self.prepare_value(value, key, source, record.model_name())
    }

    /// Normalize and validate a resolved value.
    fn prepare_value(
        &self,
        value: SeoValue,
        key: &str,
        source: &str,
        model: &str,
    ) -> SeoResult<Option<String>> {
        let value = value.normalize();
        if value.is_null() || !self.validate_value(&value, key, source, model)? {
            return Ok(None);
        }

        match value {
            SeoValue::String(s) if !s.is_empty() => Ok(Some(s)),
            _ => Ok(None),
        }
    }

    /// Check that a normalized value is a string.
    ///
    /// Returns `Ok(false)` for an invalid value in lenient mode, and a
    /// [`SeoError::TypeMismatch`] in strict mode.
    pub fn validate_value(
        &self,
        value: &SeoValue,
        key: &str,
        source: &str,
        model: &str,
    ) -> SeoResult<bool> {
        if matches!(value, SeoValue::String(_)) {
            return Ok(true);
        }

        let err = SeoError::TypeMismatch {
            key: key.to_string(),
            source_name: source.to_string(),
            value_type: value.type_name(),
            model: model.to_string(),
        };

        match self.mode {
            ResolveMode::Strict => Err(err),
            ResolveMode::Lenient => {
                error!(error = %err, "invalid seo value");
                Ok(false)
            }
        }
    }
}

/// Read the stored tags of one type from the `seo_data` object.
///
/// Scalars are kept as strings. Nested arrays and objects cannot be
/// rendered as a tag and are dropped.
fn stored_tags<R: SeoableRecord + ?Sized>(
    record: &R,
    seo_data: Option<&Value>,
    tag_type: TagType,
) -> TagMap {
    let Some(Value::Object(stored)) = seo_data.and_then(|data| data.get(tag_type.key())) else {
        return TagMap::new();
    };

    let mut tags = TagMap::new();
    for (name, value) in stored {
        let value = match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Array(_) | Value::Object(_) => {
                tracing::warn!(
                    model = %record.model_name(),
                    tag = %name,
                    "ignoring stored seo value that is not a scalar"
                );
                continue;
            }
        };
        tags.insert(name.as_str(), value);
    }
    tags
}
