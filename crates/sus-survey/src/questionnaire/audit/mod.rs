//! Batch consistency checks and rescoring over exported questionnaire records.

mod parser;

use std::io::{Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{QuestionnaireRecord, ResponseId};
use super::statistics::views::ScoreBucketEntry;
use super::statistics::ScoreBucket;
use crate::scoring::{ScoreOutcome, MAX_SCORE, MIN_SCORE};

/// Stored and recomputed scores may differ by at most this much.
pub const DISCREPANCY_TOLERANCE: f64 = 0.01;

#[derive(Debug, thiserror::Error)]
pub enum RecordImportError {
    #[error("failed to read questionnaire export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid questionnaire CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: unrecognised timestamp {value:?}")]
    Timestamp { line: usize, value: String },
    #[error("line {line}: stored score {value:?} is not a number")]
    Score { line: usize, value: String },
}

pub struct RecordImporter;

impl RecordImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<QuestionnaireRecord>, RecordImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<QuestionnaireRecord>, RecordImportError> {
        parser::parse_records(reader)
    }
}

pub struct RecordExporter;

impl RecordExporter {
    pub fn to_path<P: AsRef<Path>>(
        path: P,
        records: &[QuestionnaireRecord],
    ) -> Result<(), RecordImportError> {
        let file = std::fs::File::create(path)?;
        Self::to_writer(file, records)
    }

    pub fn to_writer<W: Write>(
        writer: W,
        records: &[QuestionnaireRecord],
    ) -> Result<(), RecordImportError> {
        parser::write_records(writer, records)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    MissingScore,
    Unscorable { errors: Vec<String> },
    Discrepancy { stored: f64, recomputed: f64, difference: f64 },
    OutOfRange { stored: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditIssue {
    pub id: ResponseId,
    pub name: String,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl std::fmt::Display for AuditIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): ", self.id, self.name)?;
        match &self.kind {
            IssueKind::MissingScore => f.write_str("missing stored score"),
            IssueKind::Unscorable { errors } => {
                write!(f, "responses not scorable ({})", errors.join("; "))
            }
            IssueKind::Discrepancy {
                stored,
                recomputed,
                difference,
            } => write!(
                f,
                "stored={stored} recomputed={recomputed} diff={difference:.2}"
            ),
            IssueKind::OutOfRange { stored } => write!(f, "stored score {stored} outside 0-100"),
        }
    }
}

/// Outcome of checking stored scores against a fresh computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub missing: usize,
    pub discrepancies: usize,
    pub out_of_range: usize,
    pub distribution: Vec<ScoreBucketEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<AuditIssue>,
}

impl AuditReport {
    pub fn passed(&self) -> bool {
        self.invalid == 0 && self.missing == 0 && self.discrepancies == 0 && self.out_of_range == 0
    }
}

/// Compare every stored score with the recomputed one.
///
/// Records without a stored score are reported as missing and not checked further.
/// Unscorable responses recompute as 0, so a positive stored score on such a record is
/// also a discrepancy.
pub fn audit(records: &[QuestionnaireRecord]) -> AuditReport {
    let mut report = AuditReport {
        total: records.len(),
        valid: 0,
        invalid: 0,
        missing: 0,
        discrepancies: 0,
        out_of_range: 0,
        distribution: Vec::new(),
        issues: Vec::new(),
    };
    let mut deciles = [0_usize; ScoreBucket::COUNT];

    for record in records {
        let issue = |kind| AuditIssue {
            id: record.id.clone(),
            name: record.respondent.name.clone(),
            kind,
        };

        let outcome = record.recomputed();
        let recomputed = outcome.value_or_zero();
        deciles[ScoreBucket::from_score(recomputed).index()] += 1;

        let Some(stored) = record.sus_score else {
            report.missing += 1;
            report.issues.push(issue(IssueKind::MissingScore));
            continue;
        };

        match outcome {
            ScoreOutcome::Scored { .. } => report.valid += 1,
            ScoreOutcome::Unscorable { errors } => {
                report.invalid += 1;
                report.issues.push(issue(IssueKind::Unscorable { errors }));
            }
        }

        if !stored.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&stored) {
            report.out_of_range += 1;
            report.issues.push(issue(IssueKind::OutOfRange { stored }));
            continue;
        }

        let difference = (stored - recomputed).abs();
        if difference > DISCREPANCY_TOLERANCE {
            report.discrepancies += 1;
            report.issues.push(issue(IssueKind::Discrepancy {
                stored,
                recomputed,
                difference,
            }));
        }
    }

    report.distribution = ScoreBucket::ordered()
        .map(|bucket| ScoreBucketEntry {
            bucket: bucket.label(),
            lower: bucket.lower(),
            upper: bucket.upper(),
            count: deciles[bucket.index()],
        })
        .collect();

    if report.passed() {
        info!(total = report.total, "questionnaire audit passed");
    } else {
        warn!(
            total = report.total,
            invalid = report.invalid,
            missing = report.missing,
            discrepancies = report.discrepancies,
            out_of_range = report.out_of_range,
            "questionnaire audit found issues"
        );
    }

    report
}

/// Recompute every stored score. Unscorable responses are stored as 0.
pub fn rescore(records: &[QuestionnaireRecord], now: DateTime<Utc>) -> Vec<QuestionnaireRecord> {
    let rescored: Vec<QuestionnaireRecord> = records
        .iter()
        .map(|record| QuestionnaireRecord {
            sus_score: Some(record.recomputed().value_or_zero()),
            updated_at: now,
            ..record.clone()
        })
        .collect();

    info!(records = rescored.len(), "questionnaire scores recomputed");
    rescored
}
