//! Reviews shown in the coach reviews modal.

use crate::coach::{CoachId, RecordId};
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_COMMENT_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Option<RecordId>,
    pub coach_id: CoachId,
    pub rating: f64,
    #[serde(default)]
    pub reviewer_name: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewReview {
    pub coach_id: CoachId,
    pub reviewer_name: String,
    /// Whole stars, 1 to 5
    pub rating: u8,
    pub comment: Option<String>,
}

impl NewReview {
    pub fn validate(&self) -> AppResult<()> {
        if !(1..=5).contains(&self.rating) {
            return Err(AppError::Validation("Rating must be between 1 and 5.".into()));
        }
        if self.reviewer_name.trim().is_empty() {
            return Err(AppError::Validation("Please enter your name.".into()));
        }
        if self
            .comment
            .as_deref()
            .is_some_and(|c| c.chars().count() > MAX_COMMENT_CHARS)
        {
            return Err(AppError::Validation(format!(
                "Comments are limited to {} characters.",
                MAX_COMMENT_CHARS
            )));
        }
        Ok(())
    }
}

/// Aggregate shown at the top of the modal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    /// Mean rating rounded to one decimal, `None` without reviews
    pub average: Option<f64>,
    pub count: usize,
    /// Number of reviews per star, index 0 = 1 star
    pub distribution: [usize; 5],
}

impl RatingSummary {
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let mut distribution = [0usize; 5];
        let mut total = 0.0;

        for review in reviews {
            total += review.rating;
            let star = review.rating.round().clamp(1.0, 5.0) as usize;
            distribution[star - 1] += 1;
        }

        let average = (!reviews.is_empty())
            .then(|| (total / reviews.len() as f64 * 10.0).round() / 10.0);

        Self {
            average,
            count: reviews.len(),
            distribution,
        }
    }
}
