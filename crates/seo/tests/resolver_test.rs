//! Resolver integration tests against records with attributes, relations
//! and methods.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::json;
use trovato_seo::{ResolveMode, SeoError, SeoResolver, SeoValue, SeoableConfig, TagMap};
use trovato_test_utils::test_record;

fn lenient() -> SeoResolver {
    SeoResolver::new(ResolveMode::Lenient)
}

fn meta(entries: &[(&str, Option<&str>)]) -> TagMap {
    entries
        .iter()
        .map(|(k, v)| (*k, (*v).map(str::to_string)))
        .collect()
}

#[test]
fn test_attribute_beats_method() {
    let record = test_record("Post")
        .with_attribute("title", "From attribute")
        .with_method("title", "From method");
    let config = SeoableConfig::default().meta("og:title", "title");

    let tags = lenient().resolve(&record, &config).unwrap();
    assert_eq!(tags.meta, meta(&[("og:title", Some("From attribute"))]));
}

#[test]
fn test_relation_beats_method() {
    let record = test_record("Post")
        .with_relation("author", "Ada")
        .with_method("author", "Someone else");
    let config = SeoableConfig::default().meta("author", "author");

    let tags = lenient().resolve(&record, &config).unwrap();
    assert_eq!(tags.meta.get("author"), Some(&Some("Ada".to_string())));
}

#[test]
fn test_to_many_relation_yields_first_element() {
    let record = test_record("Post").with_many("tags", &["a", "b"]);
    let config = SeoableConfig::default().meta("keywords", "tags");

    let tags = lenient().resolve(&record, &config).unwrap();
    assert_eq!(tags.meta.get("keywords"), Some(&Some("a".to_string())));
}

#[test]
fn test_empty_relation_resolves_to_null() {
    let record = test_record("Post").with_many("tags", &[]);
    let config = SeoableConfig::default().meta("keywords", "tags");

    let tags = lenient().resolve(&record, &config).unwrap();
    assert_eq!(tags.meta.get("keywords"), Some(&None));
}

#[test]
fn test_method_used_when_no_attribute_or_relation() {
    let record = test_record("Post").with_method("excerpt", "A short excerpt");
    let config = SeoableConfig::default().meta("description", "excerpt");

    let tags = lenient().resolve(&record, &config).unwrap();
    assert_eq!(
        tags.meta.get("description"),
        Some(&Some("A short excerpt".to_string()))
    );
}

#[test]
fn test_unknown_source_is_literal() {
    let record = test_record("Post");
    let config = SeoableConfig::default()
        .meta("og:type", "article")
        .link("robots", "nofollow");

    let tags = lenient().resolve(&record, &config).unwrap();
    assert_eq!(tags.meta.get("og:type"), Some(&Some("article".to_string())));
    assert_eq!(tags.link.get("robots"), Some(&Some("nofollow".to_string())));
}

#[test]
fn test_null_attribute_is_not_a_literal() {
    let record = test_record("Post").with_attribute("summary", SeoValue::Null);
    let config = SeoableConfig::default().meta("description", "summary");

    let tags = lenient().resolve(&record, &config).unwrap();
    assert_eq!(tags.meta.get("description"), Some(&None));
}

#[test]
fn test_file_attribute_resolves_to_public_path() {
    let record = test_record("Post").with_file("cover", "cover.jpg", "/media/2026/cover.jpg");
    let config = SeoableConfig::default().meta("og:image", "cover");

    let tags = lenient().resolve(&record, &config).unwrap();
    assert_eq!(
        tags.meta.get("og:image"),
        Some(&Some("/media/2026/cover.jpg".to_string()))
    );
}

#[test]
fn test_stored_value_wins_over_mapping() {
    let record = test_record("Post")
        .with_attribute("title", "Resolved")
        .with_seo_data(json!({"og:title": "Stored"}), json!({}));
    let config = SeoableConfig::default().meta("og:title", "title");

    let tags = lenient().resolve(&record, &config).unwrap();
    assert_eq!(tags.meta, meta(&[("og:title", Some("Stored"))]));
}

#[test]
fn test_stored_only_keys_pass_through() {
    let record = test_record("Post")
        .with_attribute("title", "Hello")
        .with_seo_data(
            json!({"twitter:card": "summary"}),
            json!({"canonical": "https://example.com/hello"}),
        );
    let config = SeoableConfig::default().meta("og:title", "title");

    let tags = lenient().resolve(&record, &config).unwrap();
    assert_eq!(
        tags.meta,
        meta(&[("og:title", Some("Hello")), ("twitter:card", Some("summary"))])
    );
    assert_eq!(
        tags.link.get("canonical"),
        Some(&Some("https://example.com/hello".to_string()))
    );
}

#[test]
fn test_stored_null_suppresses_mapping() {
    let record = test_record("Post")
        .with_attribute("title", "Resolved")
        .with_seo_data(json!({"og:title": null}), json!({}));
    let config = SeoableConfig::default().meta("og:title", "title");

    let tags = lenient().resolve(&record, &config).unwrap();
    assert_eq!(tags.meta.get("og:title"), Some(&None));
}

#[test]
fn test_custom_data_column() {
    let record = test_record("Page")
        .with_seo_data_in("additional_data", json!({"og:title": "Custom"}), json!({}))
        .with_seo_data(json!({"og:title": "Default column"}), json!({}));
    let config = SeoableConfig::default()
        .with_data_column("additional_data")
        .meta("og:title", "title");

    let tags = lenient().resolve(&record, &config).unwrap();
    assert_eq!(tags.meta.get("og:title"), Some(&Some("Custom".to_string())));
}

#[test]
fn test_missing_data_column_is_rejected() {
    let record = test_record("Page").not_jsonable("metadata");
    let err = SeoableConfig::default().validate(&record).unwrap_err();
    assert!(matches!(err, SeoError::NotJsonable { .. }));
}

#[test]
fn test_strict_mode_rejects_non_string() {
    let record = test_record("Post").with_attribute("views", SeoValue::from(json!(42)));
    let config = SeoableConfig::default().meta("og:title", "views");

    let err = SeoResolver::new(ResolveMode::Strict)
        .resolve(&record, &config)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid type of number to resolve SEO value for og:title from views on Post"
    );
}

#[test]
fn test_lenient_mode_nulls_non_string() {
    let record = test_record("Post")
        .with_attribute("views", SeoValue::from(json!(42)))
        .with_attribute("title", "Hello");
    let config = SeoableConfig::default()
        .meta("og:title", "title")
        .meta("og:views", "views");

    let tags = lenient().resolve(&record, &config).unwrap();
    assert_eq!(
        tags.meta,
        meta(&[("og:title", Some("Hello")), ("og:views", None)])
    );
}

#[test]
fn test_opaque_method_value_is_a_mismatch() {
    let record = test_record("Post").with_method("published_at", SeoValue::Opaque("datetime"));
    let config = SeoableConfig::default().meta("article:published_time", "published_at");

    let err = SeoResolver::new(ResolveMode::Strict)
        .resolve(&record, &config)
        .unwrap_err();
    assert!(matches!(
        err,
        SeoError::TypeMismatch { value_type: "datetime", .. }
    ));
}

#[test]
fn test_mapping_order_is_preserved() {
    let record = test_record("Post")
        .with_attribute("title", "Hello")
        .with_attribute("summary", "World");
    let config = SeoableConfig::default()
        .meta("og:title", "title")
        .meta("description", "summary")
        .meta("og:type", "article");

    let tags = lenient().resolve(&record, &config).unwrap();
    let keys: Vec<&str> = tags.meta.keys().collect();
    assert_eq!(keys, vec!["og:title", "description", "og:type"]);
}

#[test]
fn test_priority_chain_attribute_relation_method_literal() {
    let config = SeoableConfig::default().meta("og:title", "name");
    let resolve = |record: &trovato_test_utils::TestRecord| {
        lenient()
            .resolve(record, &config)
            .unwrap()
            .meta
            .get("og:title")
            .cloned()
            .flatten()
    };

    let record = test_record("Post")
        .with_attribute("name", "attribute")
        .with_relation("name", "relation")
        .with_method("name", "method");
    assert_eq!(resolve(&record).as_deref(), Some("attribute"));

    let record = test_record("Post")
        .with_relation("name", "relation")
        .with_method("name", "method");
    assert_eq!(resolve(&record).as_deref(), Some("relation"));

    let record = test_record("Post").with_method("name", "method");
    assert_eq!(resolve(&record).as_deref(), Some("method"));

    let record = test_record("Post");
    assert_eq!(resolve(&record).as_deref(), Some("name"));
}

#[test]
fn test_null_relation_does_not_fall_through_to_method() {
    let record = test_record("Post")
        .with_relation("author", SeoValue::Null)
        .with_method("author", "From method");
    let config = SeoableConfig::default().meta("author", "author");

    let tags = lenient().resolve(&record, &config).unwrap();
    assert_eq!(tags.meta.get("author"), Some(&None));
}
