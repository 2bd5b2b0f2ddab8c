use std::io::{Read, Write};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::super::domain::{
    DigitalProficiency, Gender, QuestionnaireRecord, Respondent, ResponseId,
};
use super::RecordImportError;

/// Header row shared by imports and exports.
pub(crate) const HEADERS: [&str; 9] = [
    "id",
    "name",
    "age",
    "gender",
    "digital_proficiency",
    "responses",
    "sus_score",
    "created_at",
    "updated_at",
];

pub(crate) fn parse_records<R: Read>(
    reader: R,
) -> Result<Vec<QuestionnaireRecord>, RecordImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<RecordRow>().enumerate() {
        // Line 1 is the header.
        let line = index + 2;
        records.push(row?.into_record(line)?);
    }

    Ok(records)
}

pub(crate) fn write_records<W: Write>(
    writer: W,
    records: &[QuestionnaireRecord],
) -> Result<(), RecordImportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(HEADERS)?;

    for record in records {
        csv_writer.serialize(ExportRow::from(record))?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct RecordRow {
    id: String,
    name: String,
    age: u8,
    gender: Gender,
    digital_proficiency: DigitalProficiency,
    responses: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    sus_score: Option<String>,
    created_at: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    updated_at: Option<String>,
}

impl RecordRow {
    fn into_record(self, line: usize) -> Result<QuestionnaireRecord, RecordImportError> {
        let sus_score = match self.sus_score {
            Some(raw) => Some(raw.parse::<f64>().map_err(|_| RecordImportError::Score {
                line,
                value: raw.clone(),
            })?),
            None => None,
        };

        let created_at = parse_timestamp(&self.created_at).ok_or_else(|| {
            RecordImportError::Timestamp {
                line,
                value: self.created_at.clone(),
            }
        })?;
        let updated_at = match self.updated_at {
            Some(raw) => parse_timestamp(&raw)
                .ok_or(RecordImportError::Timestamp { line, value: raw })?,
            None => created_at,
        };

        Ok(QuestionnaireRecord {
            id: ResponseId(self.id),
            respondent: Respondent {
                name: self.name,
                age: self.age,
                gender: self.gender,
                digital_proficiency: self.digital_proficiency,
            },
            responses: self.responses,
            sus_score,
            created_at,
            updated_at,
        })
    }
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    name: &'a str,
    age: u8,
    gender: Gender,
    digital_proficiency: DigitalProficiency,
    responses: &'a str,
    sus_score: Option<f64>,
    created_at: String,
    updated_at: String,
}

impl<'a> From<&'a QuestionnaireRecord> for ExportRow<'a> {
    fn from(record: &'a QuestionnaireRecord) -> Self {
        Self {
            id: &record.id.0,
            name: &record.respondent.name,
            age: record.respondent.age,
            gender: record.respondent.gender,
            digital_proficiency: record.respondent.digital_proficiency,
            responses: &record.responses,
            sus_score: record.sus_score,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// RFC 3339 text or integer epoch milliseconds.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    trimmed
        .parse::<i64>()
        .ok()
        .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
}
