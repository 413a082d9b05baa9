use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use csv::Writer;
use threadpool::ThreadPool;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::cli::{BatchArgs, OutputFormat};
use crate::document::is_supported;
use crate::model::{BatchMetadata, BatchReport, Candidate, FailedFile};
use crate::parser::ResumeParser;
use crate::util::{ensure_parent_directory, now_utc_string, write_json_pretty};

pub fn run(args: BatchArgs) -> Result<()> {
    let config = super::resolve_config(args.config.as_deref(), args.with_cleaned_content)?;
    let workers = args.workers.unwrap_or(config.workers);

    let files = discover_resumes(&args.folder_path, args.recursive)?;
    if files.is_empty() {
        bail!("no resumes found in {}", args.folder_path.display());
    }
    info!(count = files.len(), workers, "processing resume files");

    let parser = Arc::new(ResumeParser::new(config));
    let started = Instant::now();
    let outcome = process_parallel(parser, &args.folder_path, files, workers);
    let report = build_report(outcome, started.elapsed().as_millis() as u64);

    info!(
        succeeded = report.metadata.successful_extractions,
        failed = report.metadata.failed_extractions,
        elapsed_ms = report.metadata.elapsed_ms,
        "processing completed"
    );
    for failed in &report.failed_files {
        warn!(path = %failed.path, error = %failed.error, "failed to process resume");
    }

    if report.resumes.is_empty() {
        bail!("no files processed successfully");
    }

    match args.format {
        OutputFormat::Json => write_json_pretty(&args.output, &report)?,
        OutputFormat::Csv => write_csv(&args.output, &report)?,
    }
    info!(path = %args.output.display(), "wrote extraction results");

    Ok(())
}

/// Supported résumé files under `dir`, sorted. Only the top level is
/// searched unless `recursive` is set.
pub fn discover_resumes(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("folder does not exist: {}", dir.display());
    }

    let mut walker = WalkDir::new(dir);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_supported(path))
        .collect();
    files.sort();
    Ok(files)
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub resumes: BTreeMap<String, Candidate>,
    pub failed: Vec<FailedFile>,
}

fn report_key(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

/// Parses `files` on a fixed-size pool. Files are independent; results
/// arrive in completion order and are sorted by key afterwards.
pub fn process_parallel(
    parser: Arc<ResumeParser>,
    root: &Path,
    files: Vec<PathBuf>,
    workers: usize,
) -> BatchOutcome {
    let pool = ThreadPool::new(workers.max(1));
    let (tx, rx) = mpsc::channel();

    for path in &files {
        let tx = tx.clone();
        let parser = Arc::clone(&parser);
        let path = path.clone();
        pool.execute(move || {
            let result = parser.parse_file(&path).map_err(|err| format!("{err:#}"));
            // The receiver outlives every job.
            let _ = tx.send((path, result));
        });
    }
    drop(tx);

    let mut outcome = BatchOutcome::default();
    let mut reported = Vec::with_capacity(files.len());
    for (path, result) in rx {
        match result {
            Ok(candidate) => {
                outcome.resumes.insert(report_key(root, &path), candidate);
            }
            Err(error) => outcome.failed.push(FailedFile {
                path: path.display().to_string(),
                error,
            }),
        }
        reported.push(path);
    }

    // A job that panicked never reports back.
    for path in files.iter().filter(|path| !reported.contains(path)) {
        outcome.failed.push(FailedFile {
            path: path.display().to_string(),
            error: "worker panicked while parsing".to_string(),
        });
    }

    outcome.failed.sort_by(|a, b| a.path.cmp(&b.path));
    outcome
}

pub fn build_report(outcome: BatchOutcome, elapsed_ms: u64) -> BatchReport {
    let successful = outcome.resumes.len();
    let failed = outcome.failed.len();
    BatchReport {
        metadata: BatchMetadata {
            extraction_date: now_utc_string(),
            total_resumes: successful + failed,
            successful_extractions: successful,
            failed_extractions: failed,
            elapsed_ms,
        },
        resumes: outcome.resumes,
        failed_files: outcome.failed,
    }
}

pub fn write_csv(path: &Path, report: &BatchReport) -> Result<()> {
    ensure_parent_directory(path)?;
    let file = File::create(path)
        .with_context(|| format!("failed to create csv file: {}", path.display()))?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record([
        "File",
        "Name",
        "Emails",
        "Phone Numbers",
        "LinkedIn",
        "URLs",
        "Education",
        "Skills",
        "Work Experience",
        "Total Experience Years",
    ])?;

    for (file_name, candidate) in &report.resumes {
        let jobs: Vec<String> = candidate
            .work_experiences
            .iter()
            .map(|job| {
                format!(
                    "{} @ {} ({} - {}, {} months)",
                    job.job_title, job.company, job.from, job.to, job.duration_months
                )
            })
            .collect();

        wtr.write_record([
            file_name.clone(),
            candidate.name.clone().unwrap_or_default(),
            candidate.emails.join("; "),
            candidate.phone_numbers.join("; "),
            candidate.linkedin.join("; "),
            candidate.urls.join("; "),
            candidate.education.join("; "),
            candidate.skills.join("; "),
            jobs.join("; "),
            candidate.total_experience_years.to_string(),
        ])?;
    }

    wtr.flush()
        .with_context(|| format!("failed to write csv file: {}", path.display()))?;
    Ok(())
}
