//! Display currency for prices.

use crate::i18n::Language;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Gbp,
    Chf,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
            Currency::Chf => "CHF",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Usd => "$",
            Currency::Gbp => "£",
            Currency::Chf => "CHF",
        }
    }

    /// Format an amount the way the given UI language writes prices:
    /// `€80` / `CHF 120` in English, `80,50 €` elsewhere. Whole amounts drop
    /// the decimals.
    pub fn format_amount(&self, amount: f64, language: Language) -> String {
        let config = language.config();
        let number = if amount.fract() == 0.0 {
            format!("{:.0}", amount)
        } else {
            format!("{:.2}", amount).replace('.', &config.decimal_separator.to_string())
        };

        match (config.symbol_first, self) {
            (true, Currency::Chf) => format!("CHF {}", number),
            (true, _) => format!("{}{}", self.symbol(), number),
            (false, _) => format!("{} {}", number, self.symbol()),
        }
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            "GBP" => Ok(Currency::Gbp),
            "CHF" => Ok(Currency::Chf),
            other => Err(format!("Unsupported currency: '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_symbol_first() {
        assert_eq!(Currency::Eur.format_amount(80.0, Language::ENGLISH), "€80");
        assert_eq!(Currency::Usd.format_amount(99.5, Language::ENGLISH), "$99.50");
        assert_eq!(Currency::Chf.format_amount(120.0, Language::ENGLISH), "CHF 120");
    }

    #[test]
    fn test_other_languages_symbol_last() {
        assert_eq!(Currency::Eur.format_amount(80.5, Language::GERMAN), "80,50 €");
        assert_eq!(Currency::Gbp.format_amount(60.0, Language::FRENCH), "60 £");
    }

    #[test]
    fn test_parse() {
        assert_eq!("eur".parse::<Currency>(), Ok(Currency::Eur));
        assert_eq!(" CHF ".parse::<Currency>(), Ok(Currency::Chf));
        assert!("BTC".parse::<Currency>().is_err());
    }

    #[test]
    fn test_serde_uppercase() {
        assert_eq!(serde_json::to_string(&Currency::Gbp).unwrap(), "\"GBP\"");
    }
}
