use serde::Serialize;

/// Age brackets used by the respondent breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    UpTo17,
    From18To24,
    From25To34,
    From35To44,
    From45To54,
    From55,
}

impl AgeGroup {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::UpTo17,
            Self::From18To24,
            Self::From25To34,
            Self::From35To44,
            Self::From45To54,
            Self::From55,
        ]
    }

    pub const fn from_age(age: u8) -> Self {
        match age {
            0..=17 => Self::UpTo17,
            18..=24 => Self::From18To24,
            25..=34 => Self::From25To34,
            35..=44 => Self::From35To44,
            45..=54 => Self::From45To54,
            _ => Self::From55,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::UpTo17 => "<=17",
            Self::From18To24 => "18-24",
            Self::From25To34 => "25-34",
            Self::From35To44 => "35-44",
            Self::From45To54 => "45-54",
            Self::From55 => "55+",
        }
    }
}

/// One of ten score deciles; a perfect 100 lands in the top bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ScoreBucket(u8);

impl ScoreBucket {
    pub const COUNT: usize = 10;

    pub fn ordered() -> impl Iterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }

    /// Scores are clamped into 0..=100 first; NaN lands in the lowest bucket.
    pub fn from_score(score: f64) -> Self {
        let clamped = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 100.0)
        };
        let index = (clamped / 10.0).floor() as u8;
        Self(index.min(Self::COUNT as u8 - 1))
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn lower(self) -> u8 {
        self.0 * 10
    }

    pub const fn upper(self) -> u8 {
        if self.0 as usize == Self::COUNT - 1 {
            100
        } else {
            self.0 * 10 + 9
        }
    }

    pub fn label(self) -> String {
        format!("{}-{}", self.lower(), self.upper())
    }
}
