use serde::Serialize;

use super::super::domain::{DigitalProficiency, Gender};
use super::buckets::AgeGroup;
use crate::scoring::{Grade, Interpretation, InterpretationPolicy, ScoreCategory};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBucketEntry {
    pub bucket: String,
    pub lower: u8,
    pub upper: u8,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeEntry {
    pub grade: Grade,
    pub grade_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryEntry {
    pub category: ScoreCategory,
    pub category_label: &'static str,
    pub color: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderEntry {
    pub gender: Gender,
    pub gender_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProficiencyEntry {
    pub proficiency: DigitalProficiency,
    pub proficiency_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeGroupEntry {
    pub group: AgeGroup,
    pub group_label: &'static str,
    pub count: usize,
}

/// Submission volume and mean score for one day (`YYYY-MM-DD`) or month (`YYYY-MM`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendEntry {
    pub period: String,
    pub count: usize,
    pub mean_score: f64,
}

/// Aggregate view over every stored response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyStatistics {
    /// Records that produced a usable score.
    pub count: usize,
    /// Records with neither a positive stored score nor a computable one.
    pub skipped: usize,
    pub mean_score: f64,
    pub interpretation: Interpretation,
    pub policy: InterpretationPolicy,
    pub score_distribution: Vec<ScoreBucketEntry>,
    pub grade_distribution: Vec<GradeEntry>,
    pub category_distribution: Vec<CategoryEntry>,
    pub gender_distribution: Vec<GenderEntry>,
    pub proficiency_distribution: Vec<ProficiencyEntry>,
    pub age_distribution: Vec<AgeGroupEntry>,
    pub daily_trend: Vec<TrendEntry>,
    pub monthly_trend: Vec<TrendEntry>,
}
