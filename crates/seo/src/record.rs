//! Seoable records and their per-model configuration.
//!
//! A record exposes four capabilities to the resolver: a JSON storage
//! column, attributes, relations and methods. Each lookup returns `None`
//! when the record has no such member, and `Some(value)` otherwise, even
//! when the value itself is null.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{SeoError, SeoResult};
use crate::tags::{SourceMap, TagType};
use crate::value::SeoValue;

/// Default name of the JSON column that holds stored SEO data.
pub const DEFAULT_DATA_COLUMN: &str = "metadata";

/// Key of the SEO payload inside the data column.
pub const SEO_DATA_KEY: &str = "seo_data";

/// Capabilities a record must offer to be resolved.
pub trait SeoableRecord {
    /// Model name used in diagnostics.
    fn model_name(&self) -> &str;

    /// Whether `column` is stored as JSON.
    fn is_jsonable(&self, column: &str) -> bool;

    /// The decoded content of a JSON column.
    fn json_column(&self, column: &str) -> Option<&Value>;

    fn attribute(&self, name: &str) -> Option<SeoValue>;

    /// Value of a relation. To-many relations yield [`SeoValue::List`].
    fn relation(&self, name: &str) -> Option<SeoValue>;

    fn call_method(&self, name: &str) -> Option<SeoValue>;
}

/// Per-model SEO configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoableConfig {
    /// JSON column holding `{"seo_data": {"meta": {..}, "link": {..}}}`.
    #[serde(default = "default_data_column")]
    pub data_column: String,

    /// `meta name` → attribute, relation, method or literal value.
    #[serde(default)]
    pub meta_from: SourceMap,

    /// `link rel` → attribute, relation, method or literal value.
    #[serde(default)]
    pub link_from: SourceMap,
}

fn default_data_column() -> String {
    DEFAULT_DATA_COLUMN.to_string()
}

impl Default for SeoableConfig {
    fn default() -> Self {
        Self {
            data_column: default_data_column(),
            meta_from: SourceMap::new(),
            link_from: SourceMap::new(),
        }
    }
}

impl SeoableConfig {
    pub fn with_data_column(mut self, column: impl Into<String>) -> Self {
        self.data_column = column.into();
        self
    }

    pub fn meta(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.meta_from.insert(name, source.into());
        self
    }

    pub fn link(mut self, rel: impl Into<String>, source: impl Into<String>) -> Self {
        self.link_from.insert(rel, source.into());
        self
    }

    pub fn sources(&self, tag_type: TagType) -> &SourceMap {
        match tag_type {
            TagType::Meta => &self.meta_from,
            TagType::Link => &self.link_from,
        }
    }

    /// Check the configuration against a record.
    pub fn validate<R: SeoableRecord + ?Sized>(&self, record: &R) -> SeoResult<()> {
        if !record.is_jsonable(&self.data_column) {
            return Err(SeoError::NotJsonable {
                column: self.data_column.clone(),
                model: record.model_name().to_string(),
            });
        }
        Ok(())
    }
}

/// A record backed by a JSON object: each field is an attribute.
///
/// JSON records have no relations or methods.
#[derive(Debug, Clone, Default)]
pub struct JsonRecord {
    model: String,
    fields: Map<String, Value>,
    jsonable: HashSet<String>,
}

impl JsonRecord {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Build a record from a JSON object. Non-object values yield no fields.
    pub fn from_value(model: impl Into<String>, value: Value) -> Self {
        let fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            model: model.into(),
            fields,
            jsonable: HashSet::new(),
        }
    }

    /// Declare a column as JSON storage.
    pub fn jsonable(mut self, column: impl Into<String>) -> Self {
        self.jsonable.insert(column.into());
        self
    }

    /// Declare `column` as JSON storage when its field is missing or holds
    /// an object. Scalars and arrays stay plain attributes.
    pub fn storage_column(self, column: impl Into<String>) -> Self {
        let column = column.into();
        match self.fields.get(&column) {
            None | Some(Value::Null | Value::Object(_)) => self.jsonable(column),
            Some(_) => self,
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }
}

impl SeoableRecord for JsonRecord {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn is_jsonable(&self, column: &str) -> bool {
        self.jsonable.contains(column)
    }

    fn json_column(&self, column: &str) -> Option<&Value> {
        if !self.is_jsonable(column) {
            return None;
        }
        self.fields.get(column)
    }

    fn attribute(&self, name: &str) -> Option<SeoValue> {
        self.fields.get(name).cloned().map(SeoValue::from)
    }

    fn relation(&self, _name: &str) -> Option<SeoValue> {
        None
    }

    fn call_method(&self, _name: &str) -> Option<SeoValue> {
        None
    }
}
