//! SEO landing pages such as `/business-coaching-berlin`: a specialty,
//! optionally narrowed to a city, mapped onto pre-applied listing filters.

use crate::filters::CoachFilters;
use crate::i18n::{format_string, translate, Language};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialtyPage {
    pub slug: &'static str,
    /// Value matched against coach specialties
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CityPage {
    pub slug: &'static str,
    pub name: &'static str,
    pub country: &'static str,
}

pub const SPECIALTIES: &[SpecialtyPage] = &[
    SpecialtyPage { slug: "business", name: "Business" },
    SpecialtyPage { slug: "career", name: "Career" },
    SpecialtyPage { slug: "leadership", name: "Leadership" },
    SpecialtyPage { slug: "life", name: "Life" },
    SpecialtyPage { slug: "health", name: "Health" },
    SpecialtyPage { slug: "relationship", name: "Relationship" },
    SpecialtyPage { slug: "mindset", name: "Mindset" },
    SpecialtyPage { slug: "executive", name: "Executive" },
];

pub const CITIES: &[CityPage] = &[
    CityPage { slug: "berlin", name: "Berlin", country: "Germany" },
    CityPage { slug: "munich", name: "Munich", country: "Germany" },
    CityPage { slug: "hamburg", name: "Hamburg", country: "Germany" },
    CityPage { slug: "vienna", name: "Vienna", country: "Austria" },
    CityPage { slug: "zurich", name: "Zurich", country: "Switzerland" },
    CityPage { slug: "paris", name: "Paris", country: "France" },
    CityPage { slug: "madrid", name: "Madrid", country: "Spain" },
    CityPage { slug: "milan", name: "Milan", country: "Italy" },
    CityPage { slug: "london", name: "London", country: "United Kingdom" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandingPage {
    pub specialty: &'static SpecialtyPage,
    pub city: Option<&'static CityPage>,
}

impl LandingPage {
    /// Parse `<specialty>-coaching` or `<specialty>-coaching-<city>`.
    /// Unknown specialties or cities give `None`.
    pub fn from_slug(slug: &str) -> Option<Self> {
        let slug = slug.trim().trim_matches('/').to_lowercase();
        let (specialty_slug, rest) = slug.split_once("-coaching")?;

        let specialty = SPECIALTIES.iter().find(|s| s.slug == specialty_slug)?;
        let city = match rest {
            "" => None,
            rest => {
                let city_slug = rest.strip_prefix('-')?;
                Some(CITIES.iter().find(|c| c.slug == city_slug)?)
            }
        };

        Some(Self { specialty, city })
    }

    pub fn slug(&self) -> String {
        match self.city {
            Some(city) => format!("{}-coaching-{}", self.specialty.slug, city.slug),
            None => format!("{}-coaching", self.specialty.slug),
        }
    }

    /// Filters the listing starts with on this page. A city implies
    /// in-person sessions.
    pub fn filters(&self) -> CoachFilters {
        let mut filters = CoachFilters {
            specialties: vec![self.specialty.name.to_string()],
            ..Default::default()
        };
        if let Some(city) = self.city {
            filters.offers_onsite = true;
            filters.location_city = city.name.to_string();
            filters.location_country = city.country.to_string();
        }
        filters
    }

    pub fn meta_title(&self, language: Language) -> String {
        match self.city {
            Some(city) => format_string(
                &translate(language, "seo.title_city"),
                &[("specialty", self.specialty.name), ("city", city.name)],
            ),
            None => format_string(
                &translate(language, "seo.title"),
                &[("specialty", self.specialty.name)],
            ),
        }
    }

    pub fn meta_description(&self, language: Language, coach_count: usize) -> String {
        format_string(
            &translate(language, "seo.description"),
            &[
                ("count", &coach_count.to_string()),
                ("specialty", self.specialty.name),
            ],
        )
    }
}

/// Every landing page slug, specialty pages first.
pub fn all_slugs() -> Vec<String> {
    let plain = SPECIALTIES.iter().map(|specialty| LandingPage { specialty, city: None });
    let local = SPECIALTIES.iter().flat_map(|specialty| {
        CITIES.iter().map(move |city| LandingPage {
            specialty,
            city: Some(city),
        })
    });
    plain.chain(local).map(|page| page.slug()).collect()
}
