use serde::Serialize;
use tracing::debug;

use super::interpretation::{interpret, Interpretation, ScoreCategory};
use super::responses::{Polarity, ResponseInput, ResponseSet};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Each raw point is worth 2.5 score points, mapping the 0..=40 raw sum onto 0..=100.
const POINT_WEIGHT: f64 = 2.5;

/// A usability score in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    /// Scale a raw point total. Every result is a multiple of 2.5 and therefore exact in `f64`.
    pub fn from_raw_points(points: u8) -> Self {
        Self::clamped(f64::from(points) * POINT_WEIGHT)
    }

    /// NaN reads as 0; everything else is clamped into 0..=100.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            Self(MIN_SCORE)
        } else {
            Self(value.clamp(MIN_SCORE, MAX_SCORE))
        }
    }

    pub const fn value(self) -> f64 {
        self.0
    }
}

impl ResponseSet {
    /// Raw SUS sum in 0..=40 before scaling.
    pub fn raw_points(&self) -> u8 {
        self.iter()
            .map(|(question, likert)| match question.polarity() {
                Polarity::Positive => likert.value() - 1,
                Polarity::Negative => 5 - likert.value(),
            })
            .sum()
    }

    pub fn score(&self) -> Score {
        Score::from_raw_points(self.raw_points())
    }
}

/// Either a computed score or the reasons the set could not be scored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScoreOutcome {
    Scored { score: Score },
    Unscorable { errors: Vec<String> },
}

impl ScoreOutcome {
    pub fn score(&self) -> Option<Score> {
        match self {
            Self::Scored { score } => Some(*score),
            Self::Unscorable { .. } => None,
        }
    }

    /// Collapse to the legacy numeric contract where unscorable input reads as 0.
    pub fn value_or_zero(&self) -> f64 {
        self.score().map_or(MIN_SCORE, Score::value)
    }

    pub fn errors(&self) -> &[String] {
        match self {
            Self::Scored { .. } => &[],
            Self::Unscorable { errors } => errors,
        }
    }
}

pub fn score(input: &ResponseInput) -> ScoreOutcome {
    match ResponseSet::try_from_input(input) {
        Ok(set) => {
            let score = set.score();
            debug!(score = score.value(), "sus score calculated");
            ScoreOutcome::Scored { score }
        }
        Err(validation) => {
            debug!(errors = ?validation.errors, "sus responses not scorable");
            ScoreOutcome::Unscorable {
                errors: validation.errors,
            }
        }
    }
}

/// Score in 0..=100, or 0 for any invalid or incomplete input.
pub fn calculate_score(input: &ResponseInput) -> f64 {
    score(input).value_or_zero()
}

/// Score, interpretation, and result-page category in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub scored: bool,
    pub score: f64,
    pub interpretation: Interpretation,
    pub percentile_text: String,
    pub category: ScoreCategory,
    pub category_color: &'static str,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

pub fn analyze(input: &ResponseInput) -> Analysis {
    let outcome = score(input);
    let value = outcome.value_or_zero();
    let interpretation = interpret(value);
    let category = ScoreCategory::from_score(value);

    Analysis {
        scored: outcome.score().is_some(),
        score: value,
        percentile_text: interpretation.percentile_text(),
        interpretation,
        category,
        category_color: category.color(),
        errors: outcome.errors().to_vec(),
    }
}
