use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use serde_json::json;
use sus_survey::config::SurveyConfig;
use sus_survey::questionnaire::{
    audit, rescore, DigitalProficiency, Gender, QuestionnaireRecord, QuestionnaireRepository,
    QuestionnaireService, QuestionnaireSubmission, RecordExporter, RecordImporter,
    RepositoryError, Respondent, ResponseId,
};

#[derive(Default)]
struct VecRepository {
    records: Mutex<HashMap<ResponseId, QuestionnaireRecord>>,
}

impl VecRepository {
    fn newest_first(&self) -> Vec<QuestionnaireRecord> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<_> = guard.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        records
    }
}

impl QuestionnaireRepository for VecRepository {
    fn insert(&self, record: QuestionnaireRecord) -> Result<QuestionnaireRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ResponseId) -> Result<Option<QuestionnaireRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned())
    }

    fn delete(&self, id: &ResponseId) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn list(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<QuestionnaireRecord>, RepositoryError> {
        Ok(self.newest_first().into_iter().skip(offset).take(limit).collect())
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.records.lock().expect("repository mutex poisoned").len())
    }

    fn all(&self) -> Result<Vec<QuestionnaireRecord>, RepositoryError> {
        Ok(self.newest_first())
    }
}

fn submission(name: &str, age: u8, responses: serde_json::Value) -> QuestionnaireSubmission {
    QuestionnaireSubmission {
        respondent: Respondent {
            name: name.to_string(),
            age,
            gender: Gender::Male,
            digital_proficiency: DigitalProficiency::Advanced,
        },
        responses,
    }
}

#[test]
fn submissions_flow_into_statistics_and_audit() {
    let repository = Arc::new(VecRepository::default());
    let service = QuestionnaireService::new(repository.clone(), SurveyConfig::default());
    let day = Utc
        .with_ymd_and_hms(2024, 8, 17, 10, 0, 0)
        .single()
        .expect("valid timestamp");

    let first = service
        .submit_at(
            submission(
                "Agus",
                33,
                json!({ "q1": 4, "q2": 2, "q3": 5, "q4": 1, "q5": 3, "q6": 3, "q7": 4, "q8": 2, "q9": 5, "q10": 1 }),
            ),
            day,
        )
        .expect("first submission");
    service
        .submit_at(
            submission(
                "Sari",
                22,
                json!("{\"q1\":3,\"q2\":3,\"q3\":3,\"q4\":3,\"q5\":3,\"q6\":3,\"q7\":3,\"q8\":3,\"q9\":3,\"q10\":3}"),
            ),
            day,
        )
        .expect("second submission");

    let rejected = service.submit_at(submission("Tono", 40, json!({ "q1": 4 })), day);
    assert!(rejected.is_err());

    let statistics = service.statistics().expect("statistics");
    assert_eq!(statistics.count, 2);
    assert_eq!(statistics.mean_score, 65.0);
    assert_eq!(statistics.daily_trend.len(), 1);
    assert_eq!(statistics.daily_trend[0].period, "2024-08-17");

    let view = service.result(&first.id).expect("result view");
    assert_eq!(view.score, 80.0);

    let records = repository.all().expect("all records");
    let report = audit(&records);
    assert!(report.passed(), "{report:?}");
    assert_eq!(report.total, 2);
}

#[test]
fn rescore_repairs_exported_records() {
    let export = "\
id,name,age,gender,digital_proficiency,responses,sus_score,created_at,updated_at
sus-000101,Wati,52,Perempuan,Menengah,\"{\"\"q1\"\":4,\"\"q2\"\":2,\"\"q3\"\":5,\"\"q4\"\":1,\"\"q5\"\":3,\"\"q6\"\":3,\"\"q7\"\":4,\"\"q8\"\":2,\"\"q9\"\":5,\"\"q10\"\":1}\",,2024-02-10T04:00:00Z,2024-02-10T04:00:00Z
sus-000102,Joko,19,Laki-laki,Pemula,\"{\"\"q1\"\":\"\"5\"\",\"\"q2\"\":\"\"1\"\",\"\"q3\"\":5,\"\"q4\"\":1,\"\"q5\"\":5,\"\"q6\"\":1,\"\"q7\"\":5,\"\"q8\"\":1,\"\"q9\"\":5,\"\"q10\"\":1}\",72.5,1707537600000,1707537600000
";

    let records = RecordImporter::from_reader(export.as_bytes()).expect("import export");
    let before = audit(&records);
    assert_eq!(before.missing, 1);
    assert_eq!(before.discrepancies, 1);
    assert!(!before.passed());

    let now = Utc
        .with_ymd_and_hms(2024, 9, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp");
    let rescored = rescore(&records, now);
    assert_eq!(rescored[0].sus_score, Some(80.0));
    assert_eq!(rescored[1].sus_score, Some(100.0));

    let mut buffer = Vec::new();
    RecordExporter::to_writer(&mut buffer, &rescored).expect("export");
    let reimported = RecordImporter::from_reader(buffer.as_slice()).expect("reimport");
    assert!(audit(&reimported).passed());
    assert_eq!(reimported[1].respondent.gender, Gender::Male);
}
