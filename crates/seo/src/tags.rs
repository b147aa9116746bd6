//! Tag maps and request-scoped tag containers.

use std::collections::BTreeMap;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Insertion-ordered map keyed by tag name.
///
/// Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

// Goes through an ordered `serde_json::Map` so YAML and JSON key order survives
impl<'de, V: DeserializeOwned> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer)?
            .into_iter()
            .map(|(k, v)| serde_json::from_value(v).map(|v| (k, v)))
            .collect::<Result<Self, _>>()
            .map_err(D::Error::custom)
    }
}

/// Resolved tags of one type: name → value, `None` marks an explicit absence.
pub type TagMap = OrderedMap<Option<String>>;

/// Mapping configuration of one type: name → source.
pub type SourceMap = OrderedMap<String>;

/// The two tag types a record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagType {
    Meta,
    Link,
}

impl TagType {
    pub const ALL: [TagType; 2] = [TagType::Meta, TagType::Link];

    /// Key of this type inside the stored `seo_data` object.
    pub fn key(self) -> &'static str {
        match self {
            TagType::Meta => "meta",
            TagType::Link => "link",
        }
    }
}

/// The resolved tag set for a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoTags {
    #[serde(default)]
    pub meta: TagMap,
    #[serde(default)]
    pub link: TagMap,
}

impl SeoTags {
    pub fn of_type_mut(&mut self, tag_type: TagType) -> &mut TagMap {
        match tag_type {
            TagType::Meta => &mut self.meta,
            TagType::Link => &mut self.link,
        }
    }
}

/// A single entry in a tag container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TagEntry {
    /// `name` → `value` pair, such as `og:title`.
    Named { name: String, value: String },
    /// Free-form attribute set, such as `{rel: icon, href: .., sizes: ..}`.
    Attributes(BTreeMap<String, String>),
}

/// Input accepted by [`TagContainer::set_many`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagInput {
    Value(String),
    Attributes(BTreeMap<String, String>),
}

impl From<&str> for TagInput {
    fn from(value: &str) -> Self {
        TagInput::Value(value.to_string())
    }
}

impl From<String> for TagInput {
    fn from(value: String) -> Self {
        TagInput::Value(value)
    }
}

/// Request-scoped registry of tags of one type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagContainer {
    entries: Vec<TagEntry>,
}

impl TagContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value of a named tag, replacing any previous value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        let existing = self.entries.iter_mut().find_map(|entry| match entry {
            TagEntry::Named { name: n, value: v } if n == name => Some(v),
            _ => None,
        });
        match existing {
            Some(v) => *v = value,
            None => self.entries.push(TagEntry::Named {
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Set several tags at once. Attribute sets are appended.
    pub fn set_many<K, I>(&mut self, entries: I)
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, TagInput)>,
    {
        for (name, input) in entries {
            match input {
                TagInput::Value(value) => self.set(name.as_ref(), value),
                TagInput::Attributes(attrs) => self.append(attrs),
            }
        }
    }

    /// Append a free-form attribute set.
    pub fn append(&mut self, attributes: BTreeMap<String, String>) {
        self.entries.push(TagEntry::Attributes(attributes));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find_map(|entry| match entry {
            TagEntry::Named { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// True when the tag is unset or set to an empty string.
    pub fn is_empty_tag(&self, name: &str) -> bool {
        self.get(name).is_none_or(str::is_empty)
    }

    pub fn all(&self) -> &[TagEntry] {
        &self.entries
    }

    /// Clear every tag.
    pub fn refresh(&mut self) {
        self.entries.clear();
    }
}

/// Meta and link containers for a single page render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTags {
    pub meta: TagContainer,
    pub link: TagContainer,
}

impl PageTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy a record's resolved tags in. Null entries are skipped.
    pub fn apply_resolved(&mut self, tags: &SeoTags) {
        for (name, value) in tags.meta.iter() {
            if let Some(value) = value {
                self.meta.set(name, value.clone());
            }
        }
        for (name, value) in tags.link.iter() {
            if let Some(value) = value {
                self.link.set(name, value.clone());
            }
        }
    }
}
