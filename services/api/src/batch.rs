use chrono::Utc;
use clap::Args;
use std::path::PathBuf;
use sus_survey::error::AppError;
use sus_survey::questionnaire::{audit, rescore, AuditReport, RecordExporter, RecordImporter};
use sus_survey::scoring::{analyze, Analysis, ResponseInput};
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Response set as JSON, e.g. '{"q1":4,"q2":2,...}'
    #[arg(long)]
    pub(crate) responses: String,
    /// Emit the full analysis as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AuditArgs {
    /// CSV export of stored questionnaire responses
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Emit the report as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RescoreArgs {
    /// CSV export of stored questionnaire responses
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Destination for the rescored export (required unless --dry-run)
    #[arg(long, required_unless_present = "dry_run")]
    pub(crate) output: Option<PathBuf>,
    /// Report what would change without writing anything
    #[arg(long)]
    pub(crate) dry_run: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let analysis = analyze(&ResponseInput::Json(args.responses));
    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", render_analysis(&analysis));
    }
    Ok(())
}

pub(crate) fn run_audit(args: AuditArgs) -> Result<(), AppError> {
    let records = RecordImporter::from_path(&args.input)?;
    let report = audit(&records);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_audit(&report));
    }
    Ok(())
}

pub(crate) fn run_rescore(args: RescoreArgs) -> Result<(), AppError> {
    let records = RecordImporter::from_path(&args.input)?;
    let before = audit(&records);
    let rescored = rescore(&records, Utc::now());
    let changed = records
        .iter()
        .zip(&rescored)
        .filter(|(old, new)| old.sus_score != new.sus_score)
        .count();

    println!("Records: {}", rescored.len());
    println!("Scores changed: {changed}");
    print!("{}", render_distribution(&before));

    match args.output {
        Some(output) if !args.dry_run => {
            RecordExporter::to_path(&output, &rescored)?;
            info!(path = %output.display(), records = rescored.len(), "rescored export written");
            println!("Wrote {}", output.display());
        }
        _ => println!("Dry run: no export written"),
    }
    Ok(())
}

fn render_analysis(analysis: &Analysis) -> String {
    let mut out = String::new();
    if analysis.scored {
        out.push_str(&format!("SUS score: {:.1}\n", analysis.score));
    } else {
        out.push_str("SUS score: not scorable (reported as 0)\n");
    }
    let interpretation = &analysis.interpretation;
    out.push_str(&format!(
        "Grade: {} | {} | {} | percentile {}\n",
        interpretation.grade.label(),
        interpretation.adjective_rating.label(),
        interpretation.acceptability.label(),
        analysis.percentile_text,
    ));
    out.push_str(&format!(
        "Category: {} ({})\n",
        analysis.category.label(),
        analysis.category_color
    ));
    for error in &analysis.errors {
        out.push_str(&format!("  - {error}\n"));
    }
    out
}

fn render_distribution(report: &AuditReport) -> String {
    let mut out = String::from("Score distribution:\n");
    for entry in &report.distribution {
        out.push_str(&format!("  {:>7}: {}\n", entry.bucket, entry.count));
    }
    out
}

fn render_audit(report: &AuditReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Total records: {}\n", report.total));
    out.push_str(&format!("Valid records: {}\n", report.valid));
    out.push_str(&format!("Invalid records: {}\n", report.invalid));
    out.push_str(&format!("Missing scores: {}\n", report.missing));
    out.push_str(&format!("Score discrepancies: {}\n", report.discrepancies));
    out.push_str(&format!("Out-of-range scores: {}\n", report.out_of_range));
    out.push_str(&render_distribution(report));

    if !report.issues.is_empty() {
        out.push_str("Issues:\n");
        for issue in &report.issues {
            out.push_str(&format!("  - {issue}\n"));
        }
    }

    let verdict = if report.passed() {
        "PASSED"
    } else {
        "FAILED"
    };
    out.push_str(&format!("Audit {verdict}\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_summary_lists_errors() {
        let analysis = analyze(&ResponseInput::Json("{\"q1\":4}".to_string()));
        let text = render_analysis(&analysis);
        assert!(text.starts_with("SUS score: not scorable"));
        assert!(text.contains("Question 2 is required"));
    }

    #[test]
    fn analysis_summary_reports_grade() {
        let analysis = analyze(&ResponseInput::Json(
            "{\"q1\":4,\"q2\":2,\"q3\":5,\"q4\":1,\"q5\":3,\"q6\":3,\"q7\":4,\"q8\":2,\"q9\":5,\"q10\":1}"
                .to_string(),
        ));
        let text = render_analysis(&analysis);
        assert!(text.contains("SUS score: 80.0"));
        assert!(text.contains("Grade: B+ | Good | Acceptable | percentile 80%"));
        assert!(text.contains("Category: Good (blue)"));
    }

    #[test]
    fn audit_summary_reports_verdict() {
        let report = audit(&[]);
        let text = render_audit(&report);
        assert!(text.contains("Total records: 0"));
        assert!(text.contains("90-100: 0"));
        assert!(text.ends_with("Audit PASSED\n"));
    }
}
