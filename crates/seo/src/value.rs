//! Dynamic values yielded by seoable records.

use serde_json::{Map, Number, Value};

/// A stored file with a public URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    /// Original file name.
    pub filename: String,
    /// Public path or URL the file is served from.
    pub public_url: String,
}

impl FileRef {
    pub fn new(filename: impl Into<String>, public_url: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            public_url: public_url.into(),
        }
    }

    /// Build a file reference from a storage URI such as `local://2026/02/a.jpg`.
    ///
    /// The scheme is stripped and the remaining path is joined onto `base_url`.
    pub fn from_storage_uri(uri: &str, base_url: &str) -> Self {
        let path = uri.split_once("://").map_or(uri, |(_, rest)| rest);
        let filename = path.rsplit('/').next().unwrap_or(path).to_string();
        Self {
            filename,
            public_url: format!("{}/{}", base_url.trim_end_matches('/'), path),
        }
    }

    /// The public path of the file.
    pub fn path(&self) -> &str {
        &self.public_url
    }
}

/// A value read from a record attribute, relation or method.
#[derive(Debug, Clone, PartialEq)]
pub enum SeoValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Ordered multi-valued container (array attribute, to-many relation).
    List(Vec<SeoValue>),
    /// Ordered key/value container.
    Object(Map<String, Value>),
    File(FileRef),
    /// A host value with no JSON representation, carrying its type name.
    Opaque(&'static str),
}

impl SeoValue {
    /// Type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            SeoValue::Null => "null",
            SeoValue::Bool(_) => "bool",
            SeoValue::Number(_) => "number",
            SeoValue::String(_) => "string",
            SeoValue::List(_) => "list",
            SeoValue::Object(_) => "object",
            SeoValue::File(_) => "file",
            SeoValue::Opaque(name) => name,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SeoValue::Null)
    }

    /// Reduce a container to its first element and a file to its public path.
    ///
    /// Only one level is unwrapped: a list whose first element is itself a
    /// list stays a list.
    pub fn normalize(self) -> SeoValue {
        let value = match self {
            SeoValue::List(items) => items.into_iter().next().unwrap_or(SeoValue::Null),
            SeoValue::Object(map) => map
                .into_iter()
                .next()
                .map_or(SeoValue::Null, |(_, v)| SeoValue::from(v)),
            other => other,
        };

        match value {
            SeoValue::File(file) => SeoValue::String(file.public_url),
            other => other,
        }
    }
}

impl From<Value> for SeoValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => SeoValue::Null,
            Value::Bool(b) => SeoValue::Bool(b),
            Value::Number(n) => SeoValue::Number(n),
            Value::String(s) => SeoValue::String(s),
            Value::Array(items) => SeoValue::List(items.into_iter().map(SeoValue::from).collect()),
            Value::Object(map) => SeoValue::Object(map),
        }
    }
}

impl From<&str> for SeoValue {
    fn from(value: &str) -> Self {
        SeoValue::String(value.to_string())
    }
}

impl From<String> for SeoValue {
    fn from(value: String) -> Self {
        SeoValue::String(value)
    }
}

impl From<FileRef> for SeoValue {
    fn from(value: FileRef) -> Self {
        SeoValue::File(value)
    }
}

impl<T: Into<SeoValue>> From<Vec<T>> for SeoValue {
    fn from(values: Vec<T>) -> Self {
        SeoValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<SeoValue>> From<Option<T>> for SeoValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SeoValue::Null, Into::into)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_reduces_to_first_element() {
        let value = SeoValue::from(vec!["first", "second"]);
        assert_eq!(value.normalize(), SeoValue::from("first"));
    }

    #[test]
    fn empty_list_reduces_to_null() {
        assert!(SeoValue::List(Vec::new()).normalize().is_null());
    }

    #[test]
    fn object_reduces_to_first_value_in_order() {
        let value = SeoValue::from(json!({"z": "last-key-first", "a": "second"}));
        assert_eq!(value.normalize(), SeoValue::from("last-key-first"));
    }

    #[test]
    fn file_reduces_to_public_path() {
        let file = FileRef::new("cover.jpg", "/files/2026/02/cover.jpg");
        assert_eq!(
            SeoValue::from(file).normalize(),
            SeoValue::from("/files/2026/02/cover.jpg")
        );
    }

    #[test]
    fn list_of_files_reduces_to_first_path() {
        let value = SeoValue::List(vec![
            FileRef::new("a.jpg", "/files/a.jpg").into(),
            FileRef::new("b.jpg", "/files/b.jpg").into(),
        ]);
        assert_eq!(value.normalize(), SeoValue::from("/files/a.jpg"));
    }

    #[test]
    fn nested_lists_unwrap_one_level() {
        let value = SeoValue::from(json!([["inner"], "x"]));
        assert_eq!(value.normalize().type_name(), "list");
    }

    #[test]
    fn storage_uri_maps_to_public_url() {
        let file = FileRef::from_storage_uri("local://2026/02/abc_test.jpg", "https://example.com/files/");
        assert_eq!(file.path(), "https://example.com/files/2026/02/abc_test.jpg");
        assert_eq!(file.filename, "abc_test.jpg");
    }
}
