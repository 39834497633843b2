//! Internationalization: languages, string tables, currency and the locale
//! context.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the supported languages
//! - `language`: Validated `Language` type
//! - `strings`: Key-based string tables, one per language
//! - `currency`: Display currency and price formatting
//! - `context`: `LocaleContext` (current language/currency, observers, persistence)
//!
//! # Example
//!
//! ```rust,ignore
//! use coach_directory::i18n::{Currency, Language, LocaleContext};
//!
//! let mut locale = LocaleContext::new(Language::ENGLISH, Currency::Eur);
//! locale.subscribe(|change| println!("locale changed: {:?}", change));
//! locale.set_language(Language::from_code("de")?);
//! assert_eq!(locale.t("listing.reset_filters"), "Filter zurücksetzen");
//! ```

mod context;
mod currency;
mod language;
mod registry;
mod strings;

pub use context::{
    translate, LocaleChange, LocaleContext, PreferenceStore, Preferences, SubscriptionId,
};
pub use currency::Currency;
pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use strings::{format_string, LanguageStrings};
