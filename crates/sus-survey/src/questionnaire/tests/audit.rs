use super::common::*;
use crate::questionnaire::audit::{audit, rescore, IssueKind, RecordExporter, RecordImporter};

#[test]
fn consistent_records_pass() {
    let records = vec![
        record("sus-1", MIXED_RESPONSES, Some(80.0), at(2024, 3, 1)),
        record("sus-2", [5, 1, 5, 1, 5, 1, 5, 1, 5, 1], Some(100.0), at(2024, 3, 2)),
    ];

    let report = audit(&records);

    assert!(report.passed());
    assert_eq!(report.total, 2);
    assert_eq!(report.valid, 2);
    assert!(report.issues.is_empty());
    assert_eq!(report.distribution[8].count, 1);
    assert_eq!(report.distribution[9].count, 1);
}

#[test]
fn audit_flags_each_kind_of_issue() {
    let mut unscorable = record("sus-bad", MIXED_RESPONSES, Some(0.0), at(2024, 3, 1));
    unscorable.responses = "{\"q1\":4}".to_string();

    let records = vec![
        record("sus-missing", MIXED_RESPONSES, None, at(2024, 3, 1)),
        unscorable,
        record("sus-drift", MIXED_RESPONSES, Some(80.005), at(2024, 3, 1)),
        record("sus-wrong", MIXED_RESPONSES, Some(75.0), at(2024, 3, 1)),
        record("sus-range", MIXED_RESPONSES, Some(140.0), at(2024, 3, 1)),
    ];

    let report = audit(&records);

    assert!(!report.passed());
    assert_eq!(report.total, 5);
    assert_eq!(report.missing, 1);
    assert_eq!(report.invalid, 1);
    assert_eq!(report.valid, 3);
    assert_eq!(report.discrepancies, 1);
    assert_eq!(report.out_of_range, 1);

    let kinds: Vec<_> = report
        .issues
        .iter()
        .map(|issue| (issue.id.0.as_str(), &issue.kind))
        .collect();
    assert!(matches!(kinds[0], ("sus-missing", IssueKind::MissingScore)));
    assert!(matches!(kinds[1], ("sus-bad", IssueKind::Unscorable { .. })));
    assert!(matches!(
        kinds[2],
        ("sus-wrong", IssueKind::Discrepancy { stored, recomputed, .. })
            if *stored == 75.0 && *recomputed == 80.0
    ));
    assert!(matches!(kinds[3], ("sus-range", IssueKind::OutOfRange { .. })));
    assert!(report.issues[2].to_string().contains("diff=5.00"));
}

#[test]
fn rescore_overwrites_scores_and_bumps_timestamps() {
    let mut unscorable = record("sus-bad", MIXED_RESPONSES, Some(64.0), at(2024, 3, 1));
    unscorable.responses = "not json".to_string();
    let records = vec![
        record("sus-1", MIXED_RESPONSES, None, at(2024, 3, 1)),
        unscorable,
    ];
    let now = at(2024, 9, 1);

    let rescored = rescore(&records, now);

    assert_eq!(rescored[0].sus_score, Some(80.0));
    assert_eq!(rescored[1].sus_score, Some(0.0));
    assert!(rescored.iter().all(|record| record.updated_at == now));
    assert_eq!(rescored[0].created_at, records[0].created_at);

    let report = audit(&rescored);
    assert_eq!(report.discrepancies, 0);
    assert_eq!(report.missing, 0);
}

#[test]
fn exported_records_import_unchanged() {
    let records = vec![
        record("sus-1", MIXED_RESPONSES, Some(80.0), at(2024, 3, 1)),
        record("sus-2", MIXED_RESPONSES, None, at(2024, 3, 2)),
    ];

    let mut buffer = Vec::new();
    RecordExporter::to_writer(&mut buffer, &records).expect("export");
    let imported = RecordImporter::from_reader(buffer.as_slice()).expect("import");

    assert_eq!(imported, records);
}
