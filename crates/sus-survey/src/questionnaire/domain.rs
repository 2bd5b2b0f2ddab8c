use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scoring::{
    interpret, score, Interpretation, ResponseInput, Score, ScoreCategory, ScoreOutcome,
};

/// Identifier wrapper for stored questionnaire responses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseId(pub String);

impl std::fmt::Display for ResponseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[serde(alias = "Male", alias = "Laki-laki")]
    Male,
    #[serde(alias = "Female", alias = "Perempuan")]
    Female,
}

impl Gender {
    pub const fn ordered() -> [Self; 2] {
        [Self::Male, Self::Female]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

/// Self-reported comfort with digital products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitalProficiency {
    #[serde(alias = "Beginner", alias = "Pemula")]
    Beginner,
    #[serde(alias = "Intermediate", alias = "Menengah")]
    Intermediate,
    #[serde(alias = "Advanced", alias = "Mahir")]
    Advanced,
}

impl DigitalProficiency {
    pub const fn ordered() -> [Self; 3] {
        [Self::Beginner, Self::Intermediate, Self::Advanced]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

pub const MIN_AGE: u8 = 1;
pub const MAX_AGE: u8 = 120;

/// Respondent metadata captured before the questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Respondent {
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub digital_proficiency: DigitalProficiency,
}

impl Respondent {
    /// Trim the name and enforce the intake rules.
    pub fn sanitized(self) -> Result<Self, RespondentViolation> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(RespondentViolation::MissingName);
        }

        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(RespondentViolation::AgeOutOfRange { age: self.age });
        }

        Ok(Self { name, ..self })
    }
}

/// Validation errors raised for respondent metadata.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RespondentViolation {
    #[error("respondent name is required")]
    MissingName,
    #[error("respondent age must be between {MIN_AGE} and {MAX_AGE} (found {age})")]
    AgeOutOfRange { age: u8 },
}

/// Inbound payload: respondent metadata plus raw answers in any supported encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireSubmission {
    pub respondent: Respondent,
    pub responses: Value,
}

/// Stored questionnaire response.
///
/// `sus_score` is written at submission time so aggregate queries do not have to re-parse
/// every response set. Rows migrated from older exports may lack it, in which case the
/// score is recomputed from `responses` on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireRecord {
    pub id: ResponseId,
    pub respondent: Respondent,
    /// Response set as JSON object text.
    pub responses: String,
    pub sus_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuestionnaireRecord {
    pub fn response_input(&self) -> ResponseInput {
        ResponseInput::Json(self.responses.clone())
    }

    pub fn recomputed(&self) -> ScoreOutcome {
        score(&self.response_input())
    }

    /// The stored score when present and positive, otherwise the recomputed one.
    pub fn effective_score(&self) -> Option<f64> {
        match self.sus_score {
            Some(stored) if stored.is_finite() && stored > 0.0 => Some(stored),
            _ => self.recomputed().score().map(Score::value),
        }
    }

    pub fn result_view(&self) -> ResultView {
        let effective = self.effective_score();
        let value = effective.unwrap_or(0.0);
        let interpretation = interpret(value);
        let category = ScoreCategory::from_score(value);

        ResultView {
            id: self.id.clone(),
            respondent: self.respondent.clone(),
            scored: effective.is_some(),
            score: value,
            percentile_text: interpretation.percentile_text(),
            interpretation,
            category,
            category_color: category.color(),
            submitted_at: self.created_at,
        }
    }

    pub fn summary(&self) -> RecordSummary {
        let score = self.effective_score();
        RecordSummary {
            id: self.id.clone(),
            respondent: self.respondent.clone(),
            score,
            category: score.map(ScoreCategory::from_score),
            created_at: self.created_at,
        }
    }
}

/// Result page payload for a single response.
#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub id: ResponseId,
    pub respondent: Respondent,
    pub scored: bool,
    pub score: f64,
    pub interpretation: Interpretation,
    pub percentile_text: String,
    pub category: ScoreCategory,
    pub category_color: &'static str,
    pub submitted_at: DateTime<Utc>,
}

/// Row shown in the administrative listing.
#[derive(Debug, Clone, Serialize)]
pub struct RecordSummary {
    pub id: ResponseId,
    pub respondent: Respondent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ScoreCategory>,
    pub created_at: DateTime<Utc>,
}
