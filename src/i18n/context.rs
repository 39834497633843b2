//! Locale context: current language and currency, with change notification.
//!
//! There is no process-wide "current language". Rendering code receives a
//! `LocaleContext` and components that need to re-render on change register
//! a listener with `subscribe`.

use crate::i18n::strings::format_string;
use crate::i18n::{Currency, Language, LanguageStrings};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Persisted user preferences (the local-storage entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub language: Language,
    pub currency: Currency,
}

/// JSON file holding `Preferences`.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load stored preferences, or `None` when nothing usable is stored.
    ///
    /// A missing file is normal (first visit). A corrupt file is logged and
    /// ignored.
    pub fn load(&self) -> Option<Preferences> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(prefs) => Some(prefs),
            Err(e) => {
                warn!("Ignoring unreadable preferences at {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context(format!("Failed to create {}", parent.display()))?;
            }
        }

        let json = serde_json::to_string_pretty(prefs)?;
        std::fs::write(&self.path, json)
            .context(format!("Failed to write preferences to {}", self.path.display()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleChange {
    Language(Language),
    Currency(Currency),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&LocaleChange) + Send + Sync>;

pub struct LocaleContext {
    prefs: Preferences,
    store: Option<PreferenceStore>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl LocaleContext {
    /// In-memory context, nothing persisted.
    pub fn new(language: Language, currency: Currency) -> Self {
        Self {
            prefs: Preferences { language, currency },
            store: None,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Context backed by a preference file. Stored values win over the
    /// given defaults.
    pub fn with_store(store: PreferenceStore, defaults: Preferences) -> Self {
        let prefs = store.load().unwrap_or(defaults);
        debug!(
            "Locale initialised: language={}, currency={}",
            prefs.language.code(),
            prefs.currency.code()
        );

        Self {
            prefs,
            store: Some(store),
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn language(&self) -> Language {
        self.prefs.language
    }

    pub fn currency(&self) -> Currency {
        self.prefs.currency
    }

    pub fn preferences(&self) -> Preferences {
        self.prefs
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&LocaleChange) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Switch language. Listeners fire and the choice is persisted only if
    /// the language actually changed.
    pub fn set_language(&mut self, language: Language) {
        if self.prefs.language == language {
            return;
        }
        self.prefs.language = language;
        self.persist();
        self.notify(LocaleChange::Language(language));
    }

    pub fn set_currency(&mut self, currency: Currency) {
        if self.prefs.currency == currency {
            return;
        }
        self.prefs.currency = currency;
        self.persist();
        self.notify(LocaleChange::Currency(currency));
    }

    /// Look up a key in the current language, falling back to English and
    /// then to the key itself.
    pub fn t(&self, key: &str) -> String {
        translate(self.prefs.language, key)
    }

    /// `t` plus placeholder substitution.
    pub fn tf(&self, key: &str, args: &[(&str, &str)]) -> String {
        format_string(&self.t(key), args)
    }

    pub fn format_price(&self, amount: f64) -> String {
        self.prefs.currency.format_amount(amount, self.prefs.language)
    }

    fn persist(&self) {
        if let Some(store) = &self.store {
            // Persistence failure keeps the in-memory choice.
            if let Err(e) = store.save(&self.prefs) {
                warn!("Failed to persist preferences: {:#}", e);
            }
        }
    }

    fn notify(&self, change: LocaleChange) {
        for (_, listener) in &self.listeners {
            listener(&change);
        }
    }
}

/// Stateless lookup with English fallback.
pub fn translate(language: Language, key: &str) -> String {
    LanguageStrings::for_code(language.code())
        .get(key)
        .or_else(|| LanguageStrings::for_code(Language::canonical().code()).get(key))
        .unwrap_or(key)
        .to_string()
}
