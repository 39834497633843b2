//! Supported UI languages and their number formatting conventions.
//!
//! Immutable metadata, validated once on first access. The *current*
//! language is not stored here; it lives in a `LocaleContext`.

use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 code ("en", "de", ...)
    pub code: &'static str,
    pub name: &'static str,
    pub native_name: &'static str,
    /// Fallback for keys missing from other tables; exactly one per registry
    pub is_canonical: bool,
    /// Offered in the language switcher
    pub enabled: bool,
    /// Decimal separator in prices
    pub decimal_separator: char,
    /// `€80` rather than `80 €`
    pub symbol_first: bool,
}

const LANGUAGES: &[LanguageConfig] = &[
    LanguageConfig {
        code: "en",
        name: "English",
        native_name: "English",
        is_canonical: true,
        enabled: true,
        decimal_separator: '.',
        symbol_first: true,
    },
    LanguageConfig {
        code: "de",
        name: "German",
        native_name: "Deutsch",
        is_canonical: false,
        enabled: true,
        decimal_separator: ',',
        symbol_first: false,
    },
    LanguageConfig {
        code: "fr",
        name: "French",
        native_name: "Français",
        is_canonical: false,
        enabled: true,
        decimal_separator: ',',
        symbol_first: false,
    },
    LanguageConfig {
        code: "es",
        name: "Spanish",
        native_name: "Español",
        is_canonical: false,
        enabled: true,
        decimal_separator: ',',
        symbol_first: false,
    },
    LanguageConfig {
        code: "it",
        name: "Italian",
        native_name: "Italiano",
        is_canonical: false,
        enabled: true,
        decimal_separator: ',',
        symbol_first: false,
    },
];

pub struct LanguageRegistry {
    languages: &'static [LanguageConfig],
    canonical: &'static LanguageConfig,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// The process-wide registry.
    ///
    /// # Panics
    /// On first access, if the table does not mark exactly one language as
    /// canonical.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| {
            let mut canonical = LANGUAGES.iter().filter(|lang| lang.is_canonical);
            match (canonical.next(), canonical.next()) {
                (Some(first), None) => LanguageRegistry {
                    languages: LANGUAGES,
                    canonical: first,
                },
                (None, _) => panic!("No canonical language in registry"),
                (Some(_), Some(_)) => panic!("Multiple canonical languages in registry"),
            }
        })
    }

    pub fn get_by_code(&self, code: &str) -> Option<&'static LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Switcher order.
    pub fn list_enabled(&self) -> impl Iterator<Item = &'static LanguageConfig> {
        self.languages.iter().filter(|lang| lang.enabled)
    }

    pub fn canonical(&self) -> &'static LanguageConfig {
        self.canonical
    }

    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code).is_some_and(|lang| lang.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switcher_order() {
        let codes: Vec<_> = LanguageRegistry::get().list_enabled().map(|l| l.code).collect();
        assert_eq!(codes, vec!["en", "de", "fr", "es", "it"]);
    }

    #[test]
    fn test_lookup() {
        let registry = LanguageRegistry::get();
        let german = registry.get_by_code("de").expect("German should exist");
        assert_eq!(german.native_name, "Deutsch");
        assert_eq!(german.decimal_separator, ',');
        assert!(!german.symbol_first);

        assert!(registry.get_by_code("pt").is_none());
        assert!(!registry.is_enabled("pt"));
    }

    #[test]
    fn test_english_is_canonical() {
        let canonical = LanguageRegistry::get().canonical();
        assert_eq!(canonical.code, "en");
        assert!(canonical.symbol_first);
    }
}
