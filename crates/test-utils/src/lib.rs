//! Trovato test utilities.
//!
//! Helpers for integration testing: record fixtures with attributes,
//! relations and methods, plus assertion utilities for rendered tags.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::{Value as JsonValue, json};
use trovato_seo::{FileRef, SeoValue, SeoableRecord};

type Method = Arc<dyn Fn() -> SeoValue + Send + Sync>;

/// Create a test record for the given model.
///
/// The default `metadata` column is declared as JSON storage.
pub fn test_record(model: &str) -> TestRecord {
    TestRecord {
        model: model.to_string(),
        attributes: HashMap::new(),
        relations: HashMap::new(),
        methods: HashMap::new(),
        columns: HashMap::new(),
        jsonable: HashSet::from(["metadata".to_string()]),
    }
}

/// A record builder implementing [`SeoableRecord`].
#[derive(Clone)]
pub struct TestRecord {
    pub model: String,
    attributes: HashMap<String, SeoValue>,
    relations: HashMap<String, SeoValue>,
    methods: HashMap<String, Method>,
    columns: HashMap<String, JsonValue>,
    jsonable: HashSet<String>,
}

impl TestRecord {
    /// Add an attribute.
    pub fn with_attribute(mut self, name: &str, value: impl Into<SeoValue>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    /// Add a to-one relation.
    pub fn with_relation(mut self, name: &str, value: impl Into<SeoValue>) -> Self {
        self.relations.insert(name.to_string(), value.into());
        self
    }

    /// Add a to-many relation.
    pub fn with_many(mut self, name: &str, values: &[&str]) -> Self {
        let list = values.iter().map(|v| SeoValue::from(*v)).collect();
        self.relations.insert(name.to_string(), SeoValue::List(list));
        self
    }

    /// Add a method returning a fixed value.
    pub fn with_method(mut self, name: &str, value: impl Into<SeoValue>) -> Self {
        let value = value.into();
        self.methods
            .insert(name.to_string(), Arc::new(move || value.clone()));
        self
    }

    /// Add an attribute holding a stored file.
    pub fn with_file(self, name: &str, filename: &str, public_url: &str) -> Self {
        self.with_attribute(name, FileRef::new(filename, public_url))
    }

    /// Store SEO data in the default data column.
    pub fn with_seo_data(self, meta: JsonValue, link: JsonValue) -> Self {
        self.with_seo_data_in("metadata", meta, link)
    }

    /// Store SEO data in a custom JSON column, declaring it jsonable.
    pub fn with_seo_data_in(mut self, column: &str, meta: JsonValue, link: JsonValue) -> Self {
        self.columns.insert(
            column.to_string(),
            json!({"seo_data": {"meta": meta, "link": link}}),
        );
        self.jsonable.insert(column.to_string());
        self
    }

    /// Set the raw content of a JSON column.
    pub fn with_column(mut self, column: &str, value: JsonValue) -> Self {
        self.columns.insert(column.to_string(), value);
        self
    }

    /// Remove a column from JSON storage.
    pub fn not_jsonable(mut self, column: &str) -> Self {
        self.jsonable.remove(column);
        self
    }
}

impl std::fmt::Debug for TestRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestRecord")
            .field("model", &self.model)
            .field("attributes", &self.attributes)
            .field("relations", &self.relations)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("columns", &self.columns)
            .finish()
    }
}

impl SeoableRecord for TestRecord {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn is_jsonable(&self, column: &str) -> bool {
        self.jsonable.contains(column)
    }

    fn json_column(&self, column: &str) -> Option<&JsonValue> {
        self.columns.get(column)
    }

    fn attribute(&self, name: &str) -> Option<SeoValue> {
        self.attributes.get(name).cloned()
    }

    fn relation(&self, name: &str) -> Option<SeoValue> {
        self.relations.get(name).cloned()
    }

    fn call_method(&self, name: &str) -> Option<SeoValue> {
        self.methods.get(name).map(|method| method())
    }
}

/// Assertion helpers for rendered output.
pub mod assert {
    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{}'\nActual: {}",
            needle,
            haystack
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{}'\nActual: {}",
            needle,
            haystack
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = test_record("Post")
            .with_attribute("title", "Hello")
            .with_many("tags", &["rust", "seo"])
            .with_method("summary", "Short");

        assert_eq!(record.model_name(), "Post");
        assert_eq!(record.attribute("title"), Some(SeoValue::from("Hello")));
        assert_eq!(
            record.relation("tags"),
            Some(SeoValue::from(vec!["rust", "seo"]))
        );
        assert_eq!(record.call_method("summary"), Some(SeoValue::from("Short")));
        assert_eq!(record.call_method("missing"), None);
    }

    #[test]
    fn test_record_data_columns() {
        let record = test_record("Post");
        assert!(record.is_jsonable("metadata"));
        assert!(record.json_column("metadata").is_none());

        let record = record.with_seo_data_in("extra", json!({"og:title": "T"}), json!({}));
        assert!(record.is_jsonable("extra"));
        assert_eq!(
            record.json_column("extra").unwrap()["seo_data"]["meta"]["og:title"],
            "T"
        );

        let record = record.not_jsonable("metadata");
        assert!(!record.is_jsonable("metadata"));
    }

    #[test]
    fn test_assertions() {
        assert::contains("hello world", "world");
        assert::not_contains("hello world", "foo");
    }
}
