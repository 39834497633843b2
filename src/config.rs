use crate::i18n::{Currency, Language, Preferences};
use anyhow::{anyhow, Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Hosted data store
    pub backend_url: String,
    pub backend_anon_key: String,

    // REST API (discovery calls)
    pub api_base_url: String,

    // Locale defaults, overridden by stored preferences
    pub default_language: Language,
    pub default_currency: Currency,
    pub preferences_path: String,

    // Messaging
    pub message_poll_secs: u64,
    /// Conversation polled by the binary, if any
    pub watch_conversation: Option<String>,

    // Debug console
    pub debug_console: bool,
    pub debug_console_capacity: usize,

    // Preview server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            backend_url: std::env::var("BACKEND_URL")
                .context("BACKEND_URL not set")?
                .trim_end_matches('/')
                .to_string(),
            backend_anon_key: std::env::var("BACKEND_ANON_KEY")
                .context("BACKEND_ANON_KEY not set")?,

            api_base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),

            default_language: match std::env::var("DEFAULT_LANGUAGE") {
                Ok(code) => Language::from_code(&code).context("Invalid DEFAULT_LANGUAGE")?,
                Err(_) => Language::canonical(),
            },
            default_currency: match std::env::var("DEFAULT_CURRENCY") {
                Ok(code) => code
                    .parse::<Currency>()
                    .map_err(|e: String| anyhow!(e))
                    .context("Invalid DEFAULT_CURRENCY")?,
                Err(_) => Currency::default(),
            },
            preferences_path: std::env::var("PREFERENCES_PATH")
                .unwrap_or_else(|_| "data/preferences.json".to_string()),

            message_poll_secs: std::env::var("MESSAGE_POLL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(10),
            watch_conversation: std::env::var("WATCH_CONVERSATION")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),

            debug_console: std::env::var("DEBUG_CONSOLE")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            debug_console_capacity: std::env::var("DEBUG_CONSOLE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(200),

            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        })
    }

    pub fn default_preferences(&self) -> Preferences {
        Preferences {
            language: self.default_language,
            currency: self.default_currency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "BACKEND_URL",
        "BACKEND_ANON_KEY",
        "API_BASE_URL",
        "DEFAULT_LANGUAGE",
        "DEFAULT_CURRENCY",
        "PREFERENCES_PATH",
        "MESSAGE_POLL_SECS",
        "WATCH_CONVERSATION",
        "DEBUG_CONSOLE",
        "DEBUG_CONSOLE_CAPACITY",
        "PORT",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    fn set_required() {
        std::env::set_var("BACKEND_URL", "https://project.store.example/");
        std::env::set_var("BACKEND_ANON_KEY", "anon-key");
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        set_required();

        let config = Config::from_env().expect("Should load");
        assert_eq!(config.backend_url, "https://project.store.example");
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.default_language, Language::ENGLISH);
        assert_eq!(config.default_currency, Currency::Eur);
        assert_eq!(config.message_poll_secs, 10);
        assert!(!config.debug_console);
        assert_eq!(config.debug_console_capacity, 200);
        assert_eq!(config.port, 8080);
        assert!(config.watch_conversation.is_none());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_missing_backend_url() {
        clear_env();
        std::env::set_var("BACKEND_ANON_KEY", "anon-key");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("BACKEND_URL"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        set_required();
        std::env::set_var("DEFAULT_LANGUAGE", "de");
        std::env::set_var("DEFAULT_CURRENCY", "chf");
        std::env::set_var("MESSAGE_POLL_SECS", "0");
        std::env::set_var("DEBUG_CONSOLE", "TRUE");
        std::env::set_var("WATCH_CONVERSATION", " conv-9 ");

        let config = Config::from_env().expect("Should load");
        assert_eq!(config.default_language, Language::GERMAN);
        assert_eq!(config.default_currency, Currency::Chf);
        assert_eq!(config.message_poll_secs, 10);
        assert!(config.debug_console);
        assert_eq!(config.watch_conversation.as_deref(), Some("conv-9"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_language_rejected() {
        clear_env();
        set_required();
        std::env::set_var("DEFAULT_LANGUAGE", "xx");

        assert!(Config::from_env().is_err());

        clear_env();
    }
}
