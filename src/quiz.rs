//! Matching quiz: a short multi-step questionnaire and the heuristic that
//! turns its answers into a ranked shortlist of coaches.

use crate::coach::Coach;
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// Score weights, summing to 100 before the video bonus.
const GOAL_WEIGHT: f64 = 40.0;
const LANGUAGE_WEIGHT: f64 = 20.0;
const BUDGET_WEIGHT: f64 = 20.0;
const FORMAT_WEIGHT: f64 = 10.0;
const RATING_WEIGHT: f64 = 10.0;
const VIDEO_BONUS: f64 = 5.0;

/// Up to this fraction over budget still earns half the budget points.
const BUDGET_TOLERANCE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizStep {
    Goals,
    Language,
    Budget,
    Format,
    Results,
}

impl QuizStep {
    pub const ORDER: [QuizStep; 5] = [
        QuizStep::Goals,
        QuizStep::Language,
        QuizStep::Budget,
        QuizStep::Format,
        QuizStep::Results,
    ];

    fn index(&self) -> usize {
        Self::ORDER.iter().position(|s| s == self).unwrap_or(0)
    }

    /// i18n key of the question shown on this step.
    pub fn title_key(&self) -> &'static str {
        match self {
            QuizStep::Goals => "quiz.goals",
            QuizStep::Language => "quiz.language",
            QuizStep::Budget => "quiz.budget",
            QuizStep::Format => "quiz.format",
            QuizStep::Results => "quiz.results",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatPreference {
    Online,
    InPerson,
    #[default]
    NoPreference,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizAnswers {
    pub goals: Vec<String>,
    pub language: Option<String>,
    pub budget_max: Option<f64>,
    pub format: FormatPreference,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuizAnswer {
    Goals(Vec<String>),
    Language(Option<String>),
    Budget(Option<f64>),
    Format(FormatPreference),
}

#[derive(Debug, Clone)]
pub struct QuizState {
    step: QuizStep,
    answers: QuizAnswers,
}

impl Default for QuizState {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizState {
    pub fn new() -> Self {
        Self {
            step: QuizStep::Goals,
            answers: QuizAnswers::default(),
        }
    }

    pub fn step(&self) -> QuizStep {
        self.step
    }

    pub fn answers(&self) -> &QuizAnswers {
        &self.answers
    }

    /// (current step number, number of question steps), 1-based.
    pub fn progress(&self) -> (usize, usize) {
        let questions = QuizStep::ORDER.len() - 1;
        ((self.step.index() + 1).min(questions), questions)
    }

    pub fn is_complete(&self) -> bool {
        self.step == QuizStep::Results
    }

    /// Record the answer for the current step and move to the next one.
    pub fn answer(&mut self, answer: QuizAnswer) -> AppResult<QuizStep> {
        match (self.step, answer) {
            (QuizStep::Goals, QuizAnswer::Goals(goals)) => {
                let goals: Vec<String> = goals
                    .into_iter()
                    .map(|g| g.trim().to_string())
                    .filter(|g| !g.is_empty())
                    .collect();
                if goals.is_empty() {
                    return Err(AppError::Validation("Pick at least one goal.".into()));
                }
                self.answers.goals = goals;
            }
            (QuizStep::Language, QuizAnswer::Language(language)) => {
                self.answers.language = language
                    .map(|l| l.trim().to_string())
                    .filter(|l| !l.is_empty());
            }
            (QuizStep::Budget, QuizAnswer::Budget(budget)) => {
                if budget.is_some_and(|b| !b.is_finite() || b <= 0.0) {
                    return Err(AppError::Validation("Budget must be a positive amount.".into()));
                }
                self.answers.budget_max = budget;
            }
            (QuizStep::Format, QuizAnswer::Format(format)) => {
                self.answers.format = format;
            }
            (step, answer) => {
                return Err(AppError::Validation(format!(
                    "Answer {:?} does not belong to step {:?}",
                    answer, step
                )));
            }
        }

        self.step = QuizStep::ORDER[self.step.index() + 1];
        Ok(self.step)
    }

    /// Go back one step, keeping earlier answers. No-op on the first step.
    pub fn back(&mut self) -> QuizStep {
        let index = self.step.index();
        if index > 0 {
            self.step = QuizStep::ORDER[index - 1];
        }
        self.step
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachMatch {
    pub coach: Coach,
    /// 0 to 105
    pub score: f64,
    /// Short machine-readable reasons ("goals", "language", "budget", ...)
    pub reasons: Vec<&'static str>,
}

/// Rank coaches for the given answers, best first, at most `limit`.
///
/// Coaches sharing none of the chosen goals are left out. Ties keep the
/// input order.
pub fn match_coaches(coaches: &[Coach], answers: &QuizAnswers, limit: usize) -> Vec<CoachMatch> {
    let mut matches: Vec<CoachMatch> = coaches
        .iter()
        .filter_map(|coach| score_coach(coach, answers))
        .collect();

    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    matches.truncate(limit);
    matches
}

fn score_coach(coach: &Coach, answers: &QuizAnswers) -> Option<CoachMatch> {
    let mut score = 0.0;
    let mut reasons = Vec::new();

    if !answers.goals.is_empty() {
        let hits = answers
            .goals
            .iter()
            .filter(|goal| {
                let goal = goal.to_lowercase();
                coach
                    .specialties
                    .iter()
                    .any(|s| s.to_lowercase().contains(&goal))
            })
            .count();
        if hits == 0 {
            return None;
        }
        score += GOAL_WEIGHT * hits as f64 / answers.goals.len() as f64;
        reasons.push("goals");
    }

    match &answers.language {
        Some(language) => {
            let language = language.to_lowercase();
            if coach
                .languages
                .iter()
                .any(|l| l.to_lowercase().contains(&language))
            {
                score += LANGUAGE_WEIGHT;
                reasons.push("language");
            }
        }
        None => score += LANGUAGE_WEIGHT,
    }

    match (answers.budget_max, coach.hourly_rate) {
        (None, _) => score += BUDGET_WEIGHT,
        (Some(budget), Some(rate)) if rate <= budget => {
            score += BUDGET_WEIGHT;
            reasons.push("budget");
        }
        (Some(budget), Some(rate)) if rate <= budget * (1.0 + BUDGET_TOLERANCE) => {
            score += BUDGET_WEIGHT / 2.0;
        }
        _ => {}
    }

    match answers.format {
        FormatPreference::NoPreference => score += FORMAT_WEIGHT,
        FormatPreference::Online if coach.offers_virtual => {
            score += FORMAT_WEIGHT;
            reasons.push("format");
        }
        FormatPreference::InPerson if coach.offers_onsite => {
            score += FORMAT_WEIGHT;
            reasons.push("format");
        }
        _ => {}
    }

    if let Some(rating) = coach.rating {
        score += RATING_WEIGHT * (rating.clamp(0.0, 5.0) / 5.0);
        if rating >= crate::filters::TOP_RATED_THRESHOLD {
            reasons.push("top_rated");
        }
    }

    if coach.has_video() {
        score += VIDEO_BONUS;
        reasons.push("video");
    }

    Some(CoachMatch {
        coach: coach.clone(),
        score: (score * 10.0).round() / 10.0,
        reasons,
    })
}
