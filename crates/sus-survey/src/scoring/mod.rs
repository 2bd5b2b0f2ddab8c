//! System Usability Scale scoring engine.
//!
//! Everything in this module is pure: validation, scoring, and interpretation never fail
//! and never touch shared state. Bad input comes back as a sentinel (an unscorable
//! outcome, a zero score, or the invalid interpretation) rather than an error.

mod calculator;
mod interpretation;
mod responses;

pub use calculator::{
    analyze, calculate_score, score, Analysis, Score, ScoreOutcome, MAX_SCORE, MIN_SCORE,
};
pub use interpretation::{
    interpret, interpret_clamped, interpret_with, Acceptability, AdjectiveRating, Grade,
    Interpretation, InterpretationPolicy, ScoreCategory,
};
pub use responses::{
    normalize, validate, Answers, Likert, Polarity, Question, ResponseInput, ResponseSet,
    Validation, QUESTION_COUNT, RESPONSES_REQUIRED,
};
