use serde::{Deserialize, Serialize};

use super::calculator::{Score, MAX_SCORE, MIN_SCORE};

/// Adjective scale, ordered worst to best. `Invalid` sorts below every real rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AdjectiveRating {
    Invalid,
    Awful,
    Poor,
    #[serde(rename = "OK")]
    Ok,
    Good,
    Excellent,
}

impl AdjectiveRating {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Invalid => "Invalid",
            Self::Awful => "Awful",
            Self::Poor => "Poor",
            Self::Ok => "OK",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Acceptability {
    Invalid,
    #[serde(rename = "Not Acceptable")]
    NotAcceptable,
    Marginal,
    Acceptable,
}

impl Acceptability {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Invalid => "Invalid",
            Self::NotAcceptable => "Not Acceptable",
            Self::Marginal => "Marginal",
            Self::Acceptable => "Acceptable",
        }
    }
}

/// Letter grade, ordered F up to A+.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    F,
    D,
    #[serde(rename = "C-")]
    CMinus,
    C,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "B-")]
    BMinus,
    B,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "A-")]
    AMinus,
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl Grade {
    pub const fn ordered() -> [Self; 11] {
        [
            Self::APlus,
            Self::A,
            Self::AMinus,
            Self::BPlus,
            Self::B,
            Self::BMinus,
            Self::CPlus,
            Self::C,
            Self::CMinus,
            Self::D,
            Self::F,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::F => "F",
            Self::D => "D",
            Self::CMinus => "C-",
            Self::C => "C",
            Self::CPlus => "C+",
            Self::BMinus => "B-",
            Self::B => "B",
            Self::BPlus => "B+",
            Self::AMinus => "A-",
            Self::A => "A",
            Self::APlus => "A+",
        }
    }
}

/// Which threshold table classifies a score.
///
/// `Standard` is the fine-grained table used by every public entry point.
/// `Legacy` is the older coarse table that aggregate reporting still uses; the two
/// disagree on several bands and are kept apart on purpose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpretationPolicy {
    #[default]
    Standard,
    Legacy,
}

impl InterpretationPolicy {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Legacy => "Legacy",
        }
    }

    fn table(self) -> &'static BandTable {
        match self {
            Self::Standard => &STANDARD_TABLE,
            Self::Legacy => &LEGACY_TABLE,
        }
    }
}

struct Band {
    min: f64,
    percentile_rank: u8,
    adjective_rating: AdjectiveRating,
    acceptability: Acceptability,
    grade: Grade,
}

struct BandTable {
    bands: &'static [Band],
    floor: Band,
}

impl BandTable {
    fn classify(&self, score: f64) -> &Band {
        self.bands
            .iter()
            .find(|band| score >= band.min)
            .unwrap_or(&self.floor)
    }
}

const fn band(
    min: f64,
    percentile_rank: u8,
    adjective_rating: AdjectiveRating,
    acceptability: Acceptability,
    grade: Grade,
) -> Band {
    Band {
        min,
        percentile_rank,
        adjective_rating,
        acceptability,
        grade,
    }
}

use Acceptability::{Acceptable, Marginal, NotAcceptable};
use AdjectiveRating::{Awful, Excellent, Good, Ok as Okay, Poor};

static STANDARD_TABLE: BandTable = BandTable {
    bands: &[
        band(90.0, 96, Excellent, Acceptable, Grade::APlus),
        band(85.0, 90, Excellent, Acceptable, Grade::A),
        band(80.0, 80, Good, Acceptable, Grade::BPlus),
        band(75.0, 70, Good, Acceptable, Grade::B),
        band(70.0, 60, Good, Acceptable, Grade::CPlus),
        // 68 is the long-run average SUS score.
        band(68.0, 50, Okay, Marginal, Grade::C),
        band(60.0, 35, Okay, Marginal, Grade::CMinus),
        band(50.0, 25, Poor, NotAcceptable, Grade::D),
    ],
    floor: band(MIN_SCORE, 10, Awful, NotAcceptable, Grade::F),
};

static LEGACY_TABLE: BandTable = BandTable {
    bands: &[
        band(85.0, 95, Excellent, Acceptable, Grade::A),
        band(80.0, 90, Excellent, Acceptable, Grade::AMinus),
        band(75.0, 80, Good, Acceptable, Grade::BPlus),
        band(70.0, 70, Good, Acceptable, Grade::B),
        band(65.0, 60, Okay, Marginal, Grade::BMinus),
        band(60.0, 50, Okay, Marginal, Grade::CPlus),
        band(55.0, 40, Okay, Marginal, Grade::C),
        band(50.0, 30, Poor, NotAcceptable, Grade::CMinus),
        band(40.0, 20, Poor, NotAcceptable, Grade::D),
    ],
    floor: band(MIN_SCORE, 10, Poor, NotAcceptable, Grade::F),
};

/// Standardized reading of a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interpretation {
    pub policy: InterpretationPolicy,
    /// `None` when the input was outside the 0..=100 domain.
    pub score: Option<f64>,
    pub percentile_rank: u8,
    pub adjective_rating: AdjectiveRating,
    pub acceptability: Acceptability,
    pub grade: Grade,
}

impl Interpretation {
    pub fn invalid(policy: InterpretationPolicy) -> Self {
        Self {
            policy,
            score: None,
            percentile_rank: 0,
            adjective_rating: AdjectiveRating::Invalid,
            acceptability: Acceptability::Invalid,
            grade: Grade::F,
        }
    }

    fn classify(policy: InterpretationPolicy, score: Score) -> Self {
        let band = policy.table().classify(score.value());
        Self {
            policy,
            score: Some(score.value()),
            percentile_rank: band.percentile_rank,
            adjective_rating: band.adjective_rating,
            acceptability: band.acceptability,
            grade: band.grade,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.adjective_rating != AdjectiveRating::Invalid
    }

    pub fn percentile_text(&self) -> String {
        format!("{}%", self.percentile_rank)
    }
}

/// Interpret with the standard table; out-of-domain input yields the invalid variant.
pub fn interpret(score: f64) -> Interpretation {
    interpret_with(InterpretationPolicy::Standard, score)
}

pub fn interpret_with(policy: InterpretationPolicy, score: f64) -> Interpretation {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Interpretation::invalid(policy);
    }
    Interpretation::classify(policy, Score::clamped(score))
}

/// Clamp into 0..=100 (NaN reads as 0) before classifying. Used by aggregate reporting.
pub fn interpret_clamped(policy: InterpretationPolicy, score: f64) -> Interpretation {
    Interpretation::classify(policy, Score::clamped(score))
}

/// Four-way banding shown on the respondent's result page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    Poor,
    Ok,
    Good,
    Excellent,
}

impl ScoreCategory {
    pub const fn ordered() -> [Self; 4] {
        [Self::Excellent, Self::Good, Self::Ok, Self::Poor]
    }

    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            Self::Excellent
        } else if score >= 70.0 {
            Self::Good
        } else if score >= 50.0 {
            Self::Ok
        } else {
            Self::Poor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Ok => "OK",
            Self::Poor => "Poor",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Excellent => "green",
            Self::Good => "blue",
            Self::Ok => "yellow",
            Self::Poor => "red",
        }
    }
}
