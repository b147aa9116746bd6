//! Renders tag containers as HTML head markup.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tera::{Context as TeraContext, Tera};

use crate::error::SeoResult;
use crate::tags::{PageTags, TagContainer, TagEntry};

const HEAD_TEMPLATE: &str = "seo/head.html";

const HEAD_SOURCE: &str = r#"{% for tag in meta -%}
{% if tag.name -%}
<meta {% if tag.name is starting_with("og:") %}property{% else %}name{% endif %}="{{ tag.name | attr }}" content="{{ tag.value | attr }}">
{% else -%}
<meta{% for key, value in tag.attributes %} {{ key | attr }}="{{ value | attr }}"{% endfor %}>
{% endif -%}
{% endfor -%}
{% for tag in link -%}
{% if tag.name -%}
<link rel="{{ tag.name | attr }}" href="{{ tag.value | attr }}">
{% else -%}
<link{% for key, value in tag.attributes %} {{ key | attr }}="{{ value | attr }}"{% endfor %}>
{% endif -%}
{% endfor -%}
"#;

/// Flattened view of a [`TagEntry`] for the template.
#[derive(Serialize)]
struct TagView<'a> {
    name: Option<&'a str>,
    value: Option<&'a str>,
    attributes: Option<&'a BTreeMap<String, String>>,
}

impl<'a> From<&'a TagEntry> for TagView<'a> {
    fn from(entry: &'a TagEntry) -> Self {
        match entry {
            TagEntry::Named { name, value } => TagView {
                name: Some(name),
                value: Some(value),
                attributes: None,
            },
            TagEntry::Attributes(attributes) => TagView {
                name: None,
                value: None,
                attributes: Some(attributes),
            },
        }
    }
}

/// Renders `<meta>` and `<link>` tags.
pub struct HeadRenderer {
    tera: Tera,
}

impl HeadRenderer {
    pub fn new() -> SeoResult<Self> {
        let mut tera = Tera::default();
        // Escaping is done by the `attr` filter
        tera.autoescape_on(vec![]);
        tera.register_filter(
            "attr",
            |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
                let text = tera::try_get_value!("attr", "value", String, value);
                Ok(tera::Value::String(html_escape(&text)))
            },
        );
        tera.add_raw_template(HEAD_TEMPLATE, HEAD_SOURCE)?;
        Ok(Self { tera })
    }

    /// Render both containers of a page.
    pub fn render(&self, tags: &PageTags) -> SeoResult<String> {
        self.render_containers(&tags.meta, &tags.link)
    }

    pub fn render_containers(&self, meta: &TagContainer, link: &TagContainer) -> SeoResult<String> {
        let meta: Vec<TagView<'_>> = meta.all().iter().map(TagView::from).collect();
        let link: Vec<TagView<'_>> = link.all().iter().map(TagView::from).collect();

        let mut context = TeraContext::new();
        context.insert("meta", &meta);
        context.insert("link", &link);

        Ok(self.tera.render(HEAD_TEMPLATE, &context)?)
    }
}

impl std::fmt::Debug for HeadRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadRenderer").finish_non_exhaustive()
    }
}

/// Escape a string for use inside an HTML attribute.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
