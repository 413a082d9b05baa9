use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::ReportArgs;
use crate::model::BatchReport;

pub fn run(args: ReportArgs) -> Result<()> {
    let report = load_report(&args.report_path)?;
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", summarize(&report)).context("failed to write to stdout")?;
    Ok(())
}

pub fn load_report(path: &Path) -> Result<BatchReport> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read report: {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid report json: {}", path.display()))
}

/// Per-résumé digest of names, jobs and counts.
pub fn summarize(report: &BatchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== RESUME PARSING RESULTS ===");
    let _ = writeln!(
        out,
        "{} of {} resumes extracted on {}\n",
        report.metadata.successful_extractions,
        report.metadata.total_resumes,
        report.metadata.extraction_date
    );

    for (file_name, candidate) in &report.resumes {
        let _ = writeln!(out, "=== {file_name} ===");
        let _ = writeln!(out, "Name: {}", candidate.name.as_deref().unwrap_or("-"));
        let _ = writeln!(out, "Work Experiences:");

        if candidate.work_experiences.is_empty() {
            let _ = writeln!(out, "  No work experiences found");
        }
        for (index, job) in candidate.work_experiences.iter().enumerate() {
            let _ = writeln!(out, "  {}. Job Title: {}", index + 1, job.job_title);
            let _ = writeln!(out, "     Company: {}", job.company);
            let _ = writeln!(
                out,
                "     Duration: {} - {} ({} months)",
                job.from, job.to, job.duration_months
            );
            let _ = writeln!(
                out,
                "     Current: {}",
                if job.is_current { "Yes" } else { "No" }
            );
        }

        let _ = writeln!(out, "Total Experience: {} years", candidate.total_experience_years);
        let _ = writeln!(out, "Education: {} entries", candidate.education.len());
        let _ = writeln!(out, "Skills: {} entries", candidate.skills.len());
        let _ = writeln!(out, "Emails: {}", candidate.emails.join(", "));
        let _ = writeln!(out, "Phone: {}", candidate.phone_numbers.join(", "));
        let _ = writeln!(out, "{}\n", "-".repeat(80));
    }

    if !report.failed_files.is_empty() {
        let _ = writeln!(out, "Failed files:");
        for failed in &report.failed_files {
            let _ = writeln!(out, "  - {}: {}", failed.path, failed.error);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::ParserConfig;
    use crate::model::{BatchMetadata, FailedFile};
    use crate::parser::tests::{fixed_parser, SAMPLE_RESUME};
    use crate::util::write_json_pretty;

    fn sample_report() -> BatchReport {
        let candidate = fixed_parser(ParserConfig::default()).parse_text(SAMPLE_RESUME, None);
        BatchReport {
            metadata: BatchMetadata {
                extraction_date: "2025-03-10T00:00:00Z".to_string(),
                total_resumes: 2,
                successful_extractions: 1,
                failed_extractions: 1,
                elapsed_ms: 12,
            },
            resumes: BTreeMap::from([("jane.txt".to_string(), candidate)]),
            failed_files: vec![FailedFile {
                path: "scan.pdf".to_string(),
                error: "too little text".to_string(),
            }],
        }
    }

    #[test]
    fn summary_lists_jobs_and_failures() {
        let summary = summarize(&sample_report());

        assert!(summary.contains("1 of 2 resumes extracted"));
        assert!(summary.contains("=== jane.txt ==="));
        assert!(summary.contains("Name: Jane Q. Doe"));
        assert!(summary.contains("  1. Job Title: Senior Data Engineer"));
        assert!(summary.contains("     Duration: Jun 2018 - Feb 2021 (32 months)"));
        assert!(summary.contains("     Current: Yes"));
        assert!(summary.contains("Total Experience: 6.67 years"));
        assert!(summary.contains("Skills: 5 entries"));
        assert!(summary.contains("  - scan.pdf: too little text"));
    }

    #[test]
    fn report_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("report.json");
        let report = sample_report();
        write_json_pretty(&path, &report).expect("written");

        assert_eq!(load_report(&path).expect("loads"), report);
    }

    #[test]
    fn unreadable_report_names_the_path() {
        let err = load_report(Path::new("/nonexistent/report.json")).expect_err("missing");
        assert!(err.to_string().contains("/nonexistent/report.json"));
    }
}
