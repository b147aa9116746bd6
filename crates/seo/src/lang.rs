//! Translated strings.

/// Supported locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    /// Parse a locale code such as `fr` or `fr-CA`. Unknown codes yield English.
    pub fn from_code(code: &str) -> Self {
        let primary = code
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        match primary.as_str() {
            "fr" => Locale::Fr,
            _ => Locale::En,
        }
    }
}

const EN: &[(&str, &str)] = &[
    ("seo.name", "SEO"),
    ("seo.description", "Easily manage SEO tags for your pages."),
    ("meta.og:image:alt", "Social image for :title on :app_name"),
];

const FR: &[(&str, &str)] = &[
    ("seo.name", "SEO"),
    (
        "seo.description",
        "Gérer les balises SEO pour votre site web.",
    ),
    ("meta.og:image:alt", "Image sociale pour :title sur :app_name"),
];

/// String lookup for a single locale.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lang {
    locale: Locale,
}

impl Lang {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Look up `key`, replacing `:name` placeholders.
    ///
    /// Missing keys fall back to English, then to the key itself.
    pub fn get(&self, key: &str, replacements: &[(&str, &str)]) -> String {
        let table = match self.locale {
            Locale::En => EN,
            Locale::Fr => FR,
        };
        let template = lookup(table, key)
            .or_else(|| lookup(EN, key))
            .unwrap_or(key);

        // Longest names first so `:title_full` is not clobbered by `:title`
        let mut replacements = replacements.to_vec();
        replacements.sort_by_key(|(name, _)| std::cmp::Reverse(name.len()));

        let mut out = template.to_string();
        for (name, value) in replacements {
            out = out.replace(&format!(":{name}"), value);
        }
        out
    }
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn locale_from_code() {
        assert_eq!(Locale::from_code("fr"), Locale::Fr);
        assert_eq!(Locale::from_code("fr-CA"), Locale::Fr);
        assert_eq!(Locale::from_code("de"), Locale::En);
        assert_eq!(Locale::from_code(""), Locale::En);
    }

    #[test]
    fn replaces_placeholders() {
        let lang = Lang::new(Locale::En);
        assert_eq!(
            lang.get("meta.og:image:alt", &[("title", "Hello"), ("app_name", "Trovato")]),
            "Social image for Hello on Trovato"
        );
    }

    #[test]
    fn french_strings() {
        let lang = Lang::new(Locale::Fr);
        assert_eq!(
            lang.get("meta.og:image:alt", &[("title", "Bonjour"), ("app_name", "Trovato")]),
            "Image sociale pour Bonjour sur Trovato"
        );
    }

    #[test]
    fn unknown_key_returns_key() {
        assert_eq!(Lang::default().get("missing.key", &[]), "missing.key");
    }
}
