//! Filter and sort configuration for the coach listing.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ordering applied after filtering. `Relevance` is the default and sorts
/// exactly like `Rating`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Relevance,
    Rating,
    PriceLow,
    PriceHigh,
    Reviews,
}

impl SortBy {
    pub const ALL: [SortBy; 5] = [
        SortBy::Relevance,
        SortBy::Rating,
        SortBy::PriceLow,
        SortBy::PriceHigh,
        SortBy::Reviews,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::Rating => "rating",
            SortBy::PriceLow => "price_low",
            SortBy::PriceHigh => "price_high",
            SortBy::Reviews => "reviews",
        }
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "relevance" => Ok(SortBy::Relevance),
            "rating" => Ok(SortBy::Rating),
            "price_low" => Ok(SortBy::PriceLow),
            "price_high" => Ok(SortBy::PriceHigh),
            "reviews" => Ok(SortBy::Reviews),
            other => Err(format!("Unknown sort order: '{}'", other)),
        }
    }
}

/// Rating at or above which a coach counts as top rated.
pub const TOP_RATED_THRESHOLD: f64 = 4.5;

/// User-selected listing criteria. `Default` is the reset state: every
/// filter unset, relevance order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoachFilters {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub specialties: Vec<String>,
    pub languages: Vec<String>,
    pub has_video: bool,
    pub free_intro: bool,
    pub top_rated: bool,
    pub min_rating: Option<f64>,
    pub offers_virtual: bool,
    pub offers_onsite: bool,
    /// Only applied when `offers_onsite` is set
    pub location_country: String,
    /// Only applied when `offers_onsite` is set
    pub location_city: String,
    /// Minimum years of experience
    pub experience: Option<f64>,
    pub sort_by: SortBy,
}

impl CoachFilters {
    /// Number of filter values that differ from the reset state.
    ///
    /// Sort order is not a filter and is not counted. A non-empty selection
    /// set counts once regardless of its size. Location values only count
    /// while `offers_onsite` is set, since they are ignored otherwise.
    pub fn active_count(&self) -> usize {
        let flags = [
            self.min_price.is_some(),
            self.max_price.is_some(),
            !self.specialties.is_empty(),
            !self.languages.is_empty(),
            self.has_video,
            self.free_intro,
            self.top_rated,
            self.min_rating.is_some(),
            self.offers_virtual,
            self.offers_onsite,
            self.offers_onsite && !self.location_country.trim().is_empty(),
            self.offers_onsite && !self.location_city.trim().is_empty(),
            self.experience.is_some(),
        ];
        flags.iter().filter(|active| **active).count()
    }

    pub fn is_default(&self) -> bool {
        *self == CoachFilters::default()
    }

    /// Restore the reset state (the "reset filters" action).
    pub fn reset(&mut self) {
        *self = CoachFilters::default();
    }
}

/// Flat, query-string friendly form of the listing inputs.
///
/// Lists are comma-separated and empty strings mean "unset". Flags accept
/// `true`, `1`, `on` or `yes`; anything else is false. Unknown sort orders
/// fall back to relevance.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub specialties: Option<String>,
    pub languages: Option<String>,
    pub has_video: Option<String>,
    pub free_intro: Option<String>,
    pub top_rated: Option<String>,
    pub min_rating: Option<String>,
    pub offers_virtual: Option<String>,
    pub offers_onsite: Option<String>,
    pub location_country: Option<String>,
    pub location_city: Option<String>,
    pub experience: Option<String>,
    pub sort_by: Option<String>,
}

impl ListingQuery {
    /// Split into the free-text term and the filter configuration.
    pub fn into_parts(self) -> (String, CoachFilters) {
        let filters = CoachFilters {
            min_price: parse_number(self.min_price.as_deref()),
            max_price: parse_number(self.max_price.as_deref()),
            specialties: parse_list(self.specialties.as_deref()),
            languages: parse_list(self.languages.as_deref()),
            has_video: parse_flag(self.has_video.as_deref()),
            free_intro: parse_flag(self.free_intro.as_deref()),
            top_rated: parse_flag(self.top_rated.as_deref()),
            min_rating: parse_number(self.min_rating.as_deref()),
            offers_virtual: parse_flag(self.offers_virtual.as_deref()),
            offers_onsite: parse_flag(self.offers_onsite.as_deref()),
            location_country: self.location_country.unwrap_or_default().trim().to_string(),
            location_city: self.location_city.unwrap_or_default().trim().to_string(),
            experience: parse_number(self.experience.as_deref()),
            sort_by: self
                .sort_by
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
        };

        (self.search.unwrap_or_default(), filters)
    }
}

fn parse_number(value: Option<&str>) -> Option<f64> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|s| s.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "1" | "on" | "yes")
    )
}

fn parse_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
