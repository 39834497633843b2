//! Coach listing pipeline: search, filter, sort.
//!
//! Everything here is pure and synchronous. The listing is recomputed from
//! the full fetched set on every input change; nothing is memoized.

use crate::coach::Coach;
use crate::filters::{CoachFilters, SortBy, TOP_RATED_THRESHOLD};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub coaches: Vec<Coach>,
    /// Number of non-default filter values, for the filter badge
    pub active_filters: usize,
}

impl Listing {
    pub fn len(&self) -> usize {
        self.coaches.len()
    }

    /// True when the "no results" state (with its reset action) should show.
    pub fn is_empty(&self) -> bool {
        self.coaches.is_empty()
    }
}

/// Filter then sort. The input slice is never modified.
pub fn run_pipeline(coaches: &[Coach], search_term: &str, filters: &CoachFilters) -> Listing {
    let mut result = filter_coaches(coaches, search_term, filters);
    sort_coaches(&mut result, filters.sort_by);

    debug!(
        "Listing: {}/{} coaches, {} active filters, sort={}",
        result.len(),
        coaches.len(),
        filters.active_count(),
        filters.sort_by.as_str()
    );

    Listing {
        coaches: result,
        active_filters: filters.active_count(),
    }
}

/// Apply the free-text search and every enabled filter, preserving input
/// order.
pub fn filter_coaches(coaches: &[Coach], search_term: &str, filters: &CoachFilters) -> Vec<Coach> {
    let term = search_term.trim().to_lowercase();

    coaches
        .iter()
        .filter(|coach| term.is_empty() || matches_search(coach, &term))
        .filter(|coach| matches_filters(coach, filters))
        .cloned()
        .collect()
}

/// Stable sort: coaches with an intro video always come first, then the
/// selected metric. Coaches missing the metric go after those that have it.
pub fn sort_coaches(coaches: &mut [Coach], sort_by: SortBy) {
    coaches.sort_by(|a, b| compare(a, b, sort_by));
}

fn compare(a: &Coach, b: &Coach, sort_by: SortBy) -> Ordering {
    b.has_video().cmp(&a.has_video()).then_with(|| match sort_by {
        SortBy::Relevance | SortBy::Rating => descending(a.rating, b.rating),
        SortBy::PriceLow => ascending(a.hourly_rate, b.hourly_rate),
        SortBy::PriceHigh => descending(a.hourly_rate, b.hourly_rate),
        SortBy::Reviews => descending(
            a.review_count.map(f64::from),
            b.review_count.map(f64::from),
        ),
    })
}

fn ascending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// `term` must already be lowercased and non-empty.
fn matches_search(coach: &Coach, term: &str) -> bool {
    let fields = [
        coach.full_name.as_deref(),
        coach.title.as_deref(),
        coach.bio.as_deref(),
        coach.location.as_deref(),
        coach.location_city.as_deref(),
        coach.location_country.as_deref(),
    ];

    fields
        .into_iter()
        .flatten()
        .chain(coach.specialties.iter().map(String::as_str))
        .any(|value| contains_ci(value, term))
}

fn matches_filters(coach: &Coach, filters: &CoachFilters) -> bool {
    if let Some(min) = filters.min_price {
        if !coach.hourly_rate.is_some_and(|rate| rate >= min) {
            return false;
        }
    }

    if let Some(max) = filters.max_price {
        if !coach.hourly_rate.is_some_and(|rate| rate <= max) {
            return false;
        }
    }

    if !any_overlap(&filters.specialties, &coach.specialties) {
        return false;
    }

    if !any_overlap(&filters.languages, &coach.languages) {
        return false;
    }

    if filters.has_video && !coach.has_video() {
        return false;
    }

    if filters.free_intro && !coach.free_intro {
        return false;
    }

    if filters.top_rated && !coach.rating.is_some_and(|r| r >= TOP_RATED_THRESHOLD) {
        return false;
    }

    if let Some(min) = filters.min_rating {
        if !coach.rating.is_some_and(|r| r >= min) {
            return false;
        }
    }

    if filters.offers_virtual && !coach.offers_virtual {
        return false;
    }

    if filters.offers_onsite {
        if !coach.offers_onsite {
            return false;
        }

        let country = filters.location_country.trim().to_lowercase();
        if !country.is_empty()
            && !coach
                .location_country
                .as_deref()
                .is_some_and(|c| c.trim().to_lowercase() == country)
        {
            return false;
        }

        let city = filters.location_city.trim().to_lowercase();
        if !city.is_empty() && !coach.city().is_some_and(|c| contains_ci(c, &city)) {
            return false;
        }
    }

    if let Some(years) = filters.experience {
        if !coach.years_experience.is_some_and(|y| y >= years) {
            return false;
        }
    }

    true
}

/// An empty selection matches everything. Otherwise some selected value must
/// be a case-insensitive substring of some value the coach lists.
fn any_overlap(selected: &[String], own: &[String]) -> bool {
    if selected.is_empty() {
        return true;
    }

    selected.iter().any(|wanted| {
        let wanted = wanted.trim().to_lowercase();
        own.iter().any(|value| contains_ci(value, &wanted))
    })
}

/// `needle` must already be lowercased.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::CoachId;
    use proptest::prelude::*;

    // ==================== Helper Functions ====================

    fn coach(id: i64) -> Coach {
        Coach {
            id: Some(CoachId::Numeric(id)),
            full_name: Some(format!("Coach {}", id)),
            ..Default::default()
        }
    }

    fn priced(id: i64, rate: f64) -> Coach {
        Coach {
            hourly_rate: Some(rate),
            ..coach(id)
        }
    }

    fn ids(coaches: &[Coach]) -> Vec<i64> {
        coaches
            .iter()
            .map(|c| match c.id {
                Some(CoachId::Numeric(n)) => n,
                _ => -1,
            })
            .collect()
    }

    // ==================== Example Scenarios ====================

    #[test]
    fn test_min_price_keeps_order() {
        let coaches = vec![priced(1, 80.0), priced(2, 150.0), priced(3, 220.0)];
        let filters = CoachFilters {
            min_price: Some(100.0),
            ..Default::default()
        };

        let filtered = filter_coaches(&coaches, "", &filters);
        assert_eq!(ids(&filtered), vec![2, 3]);
    }

    #[test]
    fn test_video_coach_first_on_equal_rating() {
        let without = Coach {
            rating: Some(4.8),
            ..coach(1)
        };
        let with = Coach {
            rating: Some(4.8),
            video_url: Some("https://video.example/intro.mp4".into()),
            ..coach(2)
        };
        let filters = CoachFilters {
            sort_by: SortBy::Rating,
            ..Default::default()
        };

        let listing = run_pipeline(&[without, with], "", &filters);
        assert_eq!(ids(&listing.coaches), vec![2, 1]);
    }

    #[test]
    fn test_search_title_or_specialty() {
        let by_title = Coach {
            title: Some("Leadership Coach".into()),
            ..coach(1)
        };
        let by_specialty = Coach {
            specialties: vec!["Leadership".into()],
            ..coach(2)
        };
        let neither = Coach {
            title: Some("Nutrition".into()),
            ..coach(3)
        };

        let filtered = filter_coaches(&[by_title, by_specialty, neither], "lead", &CoachFilters::default());
        assert_eq!(ids(&filtered), vec![1, 2]);
    }

    #[test]
    fn test_search_name_or_bio() {
        let by_name = Coach {
            full_name: Some("Marta Lindqvist".into()),
            ..coach(1)
        };
        let by_bio = Coach {
            bio: Some("Former LINDQVIST & Partners consultant".into()),
            ..coach(2)
        };
        let neither = coach(3);

        let filtered = filter_coaches(&[by_name, by_bio, neither], "lindqvist", &CoachFilters::default());
        assert_eq!(ids(&filtered), vec![1, 2]);
    }

    #[test]
    fn test_search_city_or_country_columns() {
        let rows = vec![
            serde_json::json!({"id": 1, "full_name": "Anna", "location_city": "Berlin, Mitte"}),
            serde_json::json!({"id": 2, "full_name": "Jonas", "location_country": "Germany"}),
            serde_json::json!({"id": 3, "full_name": "Léa", "location": "Lyon"}),
        ];
        let coaches = crate::coach::normalize_records(rows);

        let by_city = filter_coaches(&coaches, "berlin", &CoachFilters::default());
        assert_eq!(ids(&by_city), vec![1]);

        let by_country = filter_coaches(&coaches, "germ", &CoachFilters::default());
        assert_eq!(ids(&by_country), vec![2]);

        let by_location = filter_coaches(&coaches, "LYON", &CoachFilters::default());
        assert_eq!(ids(&by_location), vec![3]);
    }

    #[test]
    fn test_empty_input() {
        let listing = run_pipeline(&[], "", &CoachFilters::default());
        assert!(listing.is_empty());
        assert_eq!(listing.active_filters, 0);
    }

    #[test]
    fn test_onsite_city_substring() {
        let berlin = Coach {
            offers_onsite: true,
            location_city: Some("Berlin, Mitte".into()),
            ..coach(1)
        };
        let filters = CoachFilters {
            offers_onsite: true,
            location_city: "berlin".into(),
            ..Default::default()
        };

        assert_eq!(filter_coaches(&[berlin], "", &filters).len(), 1);
    }

    // ==================== Filter Tests ====================

    #[test]
    fn test_location_ignored_without_onsite() {
        let remote = Coach {
            offers_virtual: true,
            ..coach(1)
        };
        let filters = CoachFilters {
            location_city: "Hamburg".into(),
            location_country: "Germany".into(),
            ..Default::default()
        };

        assert_eq!(filter_coaches(&[remote], "", &filters).len(), 1);
    }

    #[test]
    fn test_country_exact_match() {
        let coach_de = Coach {
            offers_onsite: true,
            location_country: Some("Germany".into()),
            ..coach(1)
        };
        let exact = CoachFilters {
            offers_onsite: true,
            location_country: "germany".into(),
            ..Default::default()
        };
        let partial = CoachFilters {
            offers_onsite: true,
            location_country: "germ".into(),
            ..Default::default()
        };

        assert_eq!(filter_coaches(&[coach_de.clone()], "", &exact).len(), 1);
        assert!(filter_coaches(&[coach_de], "", &partial).is_empty());
    }

    #[test]
    fn test_max_price_inclusive() {
        let coaches = vec![priced(1, 100.0), priced(2, 100.01)];
        let filters = CoachFilters {
            max_price: Some(100.0),
            ..Default::default()
        };
        assert_eq!(ids(&filter_coaches(&coaches, "", &filters)), vec![1]);
    }

    #[test]
    fn test_language_substring_any() {
        let coach = Coach {
            languages: vec!["German (native)".into(), "English".into()],
            ..coach(1)
        };
        let filters = CoachFilters {
            languages: vec!["french".into(), "GERMAN".into()],
            ..Default::default()
        };
        assert_eq!(filter_coaches(&[coach], "", &filters).len(), 1);
    }

    #[test]
    fn test_top_rated_threshold() {
        let coaches = vec![
            Coach {
                rating: Some(4.5),
                ..coach(1)
            },
            Coach {
                rating: Some(4.49),
                ..coach(2)
            },
            coach(3),
        ];
        let filters = CoachFilters {
            top_rated: true,
            ..Default::default()
        };
        assert_eq!(ids(&filter_coaches(&coaches, "", &filters)), vec![1]);
    }

    #[test]
    fn test_experience_floor() {
        let coaches = vec![
            Coach {
                years_experience: Some(10.0),
                ..coach(1)
            },
            Coach {
                years_experience: Some(2.0),
                ..coach(2)
            },
            coach(3),
        ];
        let filters = CoachFilters {
            experience: Some(5.0),
            ..Default::default()
        };
        assert_eq!(ids(&filter_coaches(&coaches, "", &filters)), vec![1]);
    }

    #[test]
    fn test_bare_coach_excluded_by_every_filter() {
        let bare = Coach::default();
        let constraints = vec![
            CoachFilters { min_price: Some(0.0), ..Default::default() },
            CoachFilters { max_price: Some(1000.0), ..Default::default() },
            CoachFilters { specialties: vec!["x".into()], ..Default::default() },
            CoachFilters { languages: vec!["x".into()], ..Default::default() },
            CoachFilters { has_video: true, ..Default::default() },
            CoachFilters { free_intro: true, ..Default::default() },
            CoachFilters { top_rated: true, ..Default::default() },
            CoachFilters { min_rating: Some(0.0), ..Default::default() },
            CoachFilters { offers_virtual: true, ..Default::default() },
            CoachFilters { offers_onsite: true, ..Default::default() },
            CoachFilters { experience: Some(0.0), ..Default::default() },
        ];

        for filters in constraints {
            assert!(
                filter_coaches(std::slice::from_ref(&bare), "", &filters).is_empty(),
                "bare coach should not match {:?}",
                filters
            );
        }
        assert_eq!(filter_coaches(&[bare], "", &CoachFilters::default()).len(), 1);
    }

    #[test]
    fn test_whitespace_search_is_no_search() {
        let filtered = filter_coaches(&[coach(1), coach(2)], "   ", &CoachFilters::default());
        assert_eq!(filtered.len(), 2);
    }

    // ==================== Sort Tests ====================

    #[test]
    fn test_sort_price_low_missing_last() {
        let mut coaches = vec![coach(1), priced(2, 90.0), priced(3, 60.0)];
        sort_coaches(&mut coaches, SortBy::PriceLow);
        assert_eq!(ids(&coaches), vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_price_high() {
        let mut coaches = vec![priced(1, 60.0), coach(2), priced(3, 90.0)];
        sort_coaches(&mut coaches, SortBy::PriceHigh);
        assert_eq!(ids(&coaches), vec![3, 1, 2]);
    }

    #[test]
    fn test_sort_reviews() {
        let mut coaches = vec![
            Coach {
                review_count: Some(3),
                ..coach(1)
            },
            Coach {
                review_count: Some(40),
                ..coach(2)
            },
        ];
        sort_coaches(&mut coaches, SortBy::Reviews);
        assert_eq!(ids(&coaches), vec![2, 1]);
    }

    #[test]
    fn test_relevance_equals_rating() {
        let coaches = vec![
            Coach { rating: Some(3.9), ..coach(1) },
            Coach { rating: Some(4.9), ..coach(2) },
            coach(3),
            Coach { rating: Some(4.2), video_url: Some("v".into()), ..coach(4) },
        ];

        let mut by_relevance = coaches.clone();
        let mut by_rating = coaches;
        sort_coaches(&mut by_relevance, SortBy::Relevance);
        sort_coaches(&mut by_rating, SortBy::Rating);

        assert_eq!(by_relevance, by_rating);
        assert_eq!(ids(&by_rating), vec![4, 2, 1, 3]);
    }

    #[test]
    fn test_pipeline_does_not_mutate_input() {
        let coaches = vec![priced(1, 10.0), priced(2, 20.0)];
        let before = coaches.clone();
        let filters = CoachFilters {
            sort_by: SortBy::PriceHigh,
            ..Default::default()
        };

        let listing = run_pipeline(&coaches, "", &filters);
        assert_eq!(coaches, before);
        assert_eq!(ids(&listing.coaches), vec![2, 1]);
    }

    // ==================== Property Tests ====================

    fn arb_coach() -> impl Strategy<Value = Coach> {
        (
            0i64..1000,
            proptest::option::of(0.0f64..500.0),
            proptest::option::of(0.0f64..5.0),
            proptest::option::of(0u32..500),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            proptest::collection::vec(prop_oneof![Just("Leadership"), Just("Career"), Just("Health")], 0..3),
            proptest::option::of(prop_oneof![Just("Berlin"), Just("Munich, Schwabing")]),
        )
            .prop_map(
                |(id, rate, rating, reviews, video, onsite, virt, specialties, city)| Coach {
                    id: Some(CoachId::Numeric(id)),
                    full_name: Some(format!("Coach {}", id)),
                    hourly_rate: rate,
                    rating,
                    review_count: reviews,
                    video_url: video.then(|| "https://video.example".to_string()),
                    offers_onsite: onsite,
                    offers_virtual: virt,
                    specialties: specialties.into_iter().map(String::from).collect(),
                    location_city: city.map(String::from),
                    ..Default::default()
                },
            )
    }

    fn arb_sort() -> impl Strategy<Value = SortBy> {
        prop_oneof![
            Just(SortBy::Relevance),
            Just(SortBy::Rating),
            Just(SortBy::PriceLow),
            Just(SortBy::PriceHigh),
            Just(SortBy::Reviews),
        ]
    }

    proptest! {
        #[test]
        fn prop_idempotent(coaches in proptest::collection::vec(arb_coach(), 0..30), sort in arb_sort()) {
            let filters = CoachFilters { sort_by: sort, ..Default::default() };
            let first = run_pipeline(&coaches, "coach", &filters);
            let second = run_pipeline(&coaches, "coach", &filters);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_video_first(coaches in proptest::collection::vec(arb_coach(), 0..30), sort in arb_sort()) {
            let filters = CoachFilters { sort_by: sort, ..Default::default() };
            let listing = run_pipeline(&coaches, "", &filters);
            let first_without = listing.coaches.iter().position(|c| !c.has_video());
            if let Some(pos) = first_without {
                prop_assert!(listing.coaches[pos..].iter().all(|c| !c.has_video()));
            }
        }

        #[test]
        fn prop_extra_filter_never_grows(
            coaches in proptest::collection::vec(arb_coach(), 0..30),
            min_price in 0.0f64..500.0,
            min_rating in 0.0f64..5.0,
        ) {
            let base = CoachFilters { offers_onsite: true, ..Default::default() };
            let base_len = filter_coaches(&coaches, "", &base).len();

            let narrowed = [
                CoachFilters { min_price: Some(min_price), ..base.clone() },
                CoachFilters { min_rating: Some(min_rating), ..base.clone() },
                CoachFilters { has_video: true, ..base.clone() },
                CoachFilters { top_rated: true, ..base.clone() },
                CoachFilters { location_city: "berlin".into(), ..base.clone() },
                CoachFilters { specialties: vec!["career".into()], ..base.clone() },
            ];

            for filters in narrowed {
                prop_assert!(filter_coaches(&coaches, "", &filters).len() <= base_len);
            }
        }

        #[test]
        fn prop_search_matches_any_field(coaches in proptest::collection::vec(arb_coach(), 0..30)) {
            let filtered = filter_coaches(&coaches, "CAREER", &CoachFilters::default());
            for coach in &filtered {
                prop_assert!(coach.specialties.iter().any(|s| s.to_lowercase().contains("career")));
            }
            let expected = coaches
                .iter()
                .filter(|c| c.specialties.iter().any(|s| s == "Career"))
                .count();
            prop_assert_eq!(filtered.len(), expected);
        }
    }
}
