//! Read-only aggregation over stored questionnaire records.

mod buckets;
mod tally;
pub mod views;

pub use buckets::{AgeGroup, ScoreBucket};
pub use views::SurveyStatistics;

use super::domain::QuestionnaireRecord;

/// Aggregate a snapshot of records. Records with no usable score are counted as skipped.
pub fn aggregate(records: &[QuestionnaireRecord]) -> SurveyStatistics {
    SurveyStatistics::from_records(records)
}
