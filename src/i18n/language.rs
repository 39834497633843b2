//! Language type: validated language representation.

use crate::i18n::{LanguageConfig, LanguageRegistry};
use anyhow::{bail, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A language that has been validated against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "en", "de")
    code: &'static str,
}

impl Language {
    pub const ENGLISH: Language = Language { code: "en" };
    pub const GERMAN: Language = Language { code: "de" };
    pub const FRENCH: Language = Language { code: "fr" };
    pub const SPANISH: Language = Language { code: "es" };
    pub const ITALIAN: Language = Language { code: "it" };

    /// Accepts plain codes ("de") as well as locale tags ("de-AT", "fr_CH");
    /// only the primary subtag is looked up.
    pub fn from_code(code: &str) -> Result<Language> {
        let primary = code
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        match LanguageRegistry::get().get_by_code(&primary) {
            Some(config) if config.enabled => Ok(Language { code: config.code }),
            Some(_) => bail!("Language '{}' is not enabled", code),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// The fallback language for missing strings.
    pub fn canonical() -> Language {
        let config = LanguageRegistry::get().canonical();
        Language { code: config.code }
    }

    /// All languages selectable in the UI.
    pub fn all_enabled() -> Vec<Language> {
        LanguageRegistry::get()
            .list_enabled()
            .map(|config| Language { code: config.code })
            .collect()
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Registry entry. Every `Language` is built from a registry code, so the
    /// canonical entry is only a formality.
    pub fn config(&self) -> &'static LanguageConfig {
        let registry = LanguageRegistry::get();
        registry
            .get_by_code(self.code)
            .unwrap_or_else(|| registry.canonical())
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::canonical()
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Language::from_code(&code).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(Language::ENGLISH.code(), "en");
        assert!(Language::ENGLISH.is_canonical());
        assert_eq!(Language::GERMAN.native_name(), "Deutsch");
        assert_eq!(Language::ITALIAN.name(), "Italian");
        assert!(!Language::FRENCH.is_canonical());
    }

    #[test]
    fn test_from_code() {
        let spanish = Language::from_code("es").expect("Should succeed");
        assert_eq!(spanish, Language::SPANISH);
    }

    #[test]
    fn test_from_locale_tag() {
        assert_eq!(Language::from_code("de-AT").unwrap(), Language::GERMAN);
        assert_eq!(Language::from_code("FR_ch").unwrap(), Language::FRENCH);
    }

    #[test]
    fn test_from_code_invalid() {
        let result = Language::from_code("pt");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown"));
        assert!(Language::from_code("").is_err());
    }

    #[test]
    fn test_all_enabled_has_five() {
        assert_eq!(Language::all_enabled().len(), 5);
    }

    #[test]
    fn test_serde_as_code() {
        let json = serde_json::to_string(&Language::GERMAN).unwrap();
        assert_eq!(json, "\"de\"");
        let back: Language = serde_json::from_str("\"it\"").unwrap();
        assert_eq!(back, Language::ITALIAN);
        assert!(serde_json::from_str::<Language>("\"xx\"").is_err());
    }

    #[test]
    fn test_default_is_canonical() {
        assert_eq!(Language::default(), Language::ENGLISH);
    }
}
