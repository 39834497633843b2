//! Coach records: the lenient wire shape and the canonical internal type.
//!
//! The hosted store has accumulated several names for the same column
//! (`rating` vs `rating_average`, three video URL columns, booleans next to
//! format arrays). `RawCoachRecord` accepts all of them; `Coach::from_raw`
//! collapses them once, at fetch time, so nothing downstream ever branches on
//! field-name variants.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// Row identifier. Newer rows use UUID text, legacy rows a numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Numeric(i64),
    Text(String),
}

pub type CoachId = RecordId;

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Numeric(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        match value.parse::<i64>() {
            Ok(n) => RecordId::Numeric(n),
            Err(_) => RecordId::Text(value.to_string()),
        }
    }
}

/// Coach row exactly as the store returns it. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCoachRecord {
    pub id: Option<CoachId>,
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub location_city: Option<String>,
    pub location_country: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: Option<String>,

    // Array or comma-separated text
    pub languages: Option<Value>,
    pub specialties: Option<Value>,

    // Number or numeric text
    pub hourly_rate: Option<Value>,
    pub rating_average: Option<Value>,
    pub rating: Option<Value>,
    pub rating_count: Option<Value>,
    pub reviews_count: Option<Value>,
    pub years_experience: Option<Value>,
    pub experience_years: Option<Value>,

    pub intro_video_url: Option<String>,
    pub video_url: Option<String>,
    pub video_intro_url: Option<String>,

    pub session_formats: Option<Value>,
    pub session_types: Option<Value>,
    pub offers_online: Option<Value>,
    pub offers_in_person: Option<Value>,
    pub offers_free_intro: Option<Value>,
    pub free_intro_call: Option<Value>,
}

/// Canonical coach used by the listing pipeline, quiz and landing pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Coach {
    pub id: Option<CoachId>,
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub location_city: Option<String>,
    pub location_country: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: Option<String>,
    pub languages: Vec<String>,
    pub specialties: Vec<String>,
    pub hourly_rate: Option<f64>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub years_experience: Option<f64>,
    pub video_url: Option<String>,
    pub offers_virtual: bool,
    pub offers_onsite: bool,
    pub free_intro: bool,
}

const VIRTUAL_FORMATS: &[&str] = &["online", "virtual", "video", "remote"];
const ONSITE_FORMATS: &[&str] = &[
    "in_person",
    "in-person",
    "in person",
    "onsite",
    "on-site",
    "on_site",
    "offline",
];

impl Coach {
    /// Collapse a raw row into the canonical shape.
    ///
    /// Newer column names take precedence over legacy ones. Blank strings and
    /// unparseable numbers are treated as absent.
    pub fn from_raw(raw: RawCoachRecord) -> Self {
        let formats: Vec<String> = string_list(raw.session_formats.as_ref())
            .into_iter()
            .chain(string_list(raw.session_types.as_ref()))
            .map(|f| f.to_lowercase())
            .collect();

        let offers_virtual = flag(raw.offers_online.as_ref()) == Some(true)
            || formats.iter().any(|f| VIRTUAL_FORMATS.contains(&f.as_str()));
        let offers_onsite = flag(raw.offers_in_person.as_ref()) == Some(true)
            || formats.iter().any(|f| ONSITE_FORMATS.contains(&f.as_str()));

        Self {
            id: raw.id.filter(|id| !matches!(id, RecordId::Text(s) if s.trim().is_empty())),
            full_name: text(raw.full_name),
            title: text(raw.title),
            bio: text(raw.bio),
            location: text(raw.location),
            location_city: text(raw.location_city),
            location_country: text(raw.location_country),
            avatar_url: text(raw.avatar_url),
            created_at: text(raw.created_at),
            languages: string_list(raw.languages.as_ref()),
            specialties: string_list(raw.specialties.as_ref()),
            hourly_rate: number(raw.hourly_rate.as_ref()),
            rating: number(raw.rating_average.as_ref()).or_else(|| number(raw.rating.as_ref())),
            review_count: number(raw.rating_count.as_ref())
                .or_else(|| number(raw.reviews_count.as_ref()))
                .filter(|n| *n >= 0.0)
                .map(|n| n as u32),
            years_experience: number(raw.years_experience.as_ref())
                .or_else(|| number(raw.experience_years.as_ref())),
            video_url: text(raw.intro_video_url)
                .or_else(|| text(raw.video_url))
                .or_else(|| text(raw.video_intro_url)),
            offers_virtual,
            offers_onsite,
            free_intro: flag(raw.offers_free_intro.as_ref())
                .or_else(|| flag(raw.free_intro_call.as_ref()))
                .unwrap_or(false),
        }
    }

    pub fn has_video(&self) -> bool {
        self.video_url.is_some()
    }

    /// City used for location matching: the dedicated column, else the
    /// free-text location.
    pub fn city(&self) -> Option<&str> {
        self.location_city
            .as_deref()
            .or(self.location.as_deref())
    }

    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or("Coach")
    }
}

/// Normalize a batch of JSON rows, skipping rows that don't even parse as an
/// object of the expected field types.
pub fn normalize_records(rows: Vec<Value>) -> Vec<Coach> {
    let total = rows.len();
    let coaches: Vec<Coach> = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<RawCoachRecord>(row) {
            Ok(raw) => Some(Coach::from_raw(raw)),
            Err(e) => {
                warn!("Skipping malformed coach record: {}", e);
                None
            }
        })
        .collect();

    if coaches.len() != total {
        warn!("Normalized {}/{} coach records", coaches.len(), total);
    }

    coaches
}

fn text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn flag(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    let items: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };

    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
