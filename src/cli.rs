use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "resume_extractor",
    version,
    about = "Extract contact details, education, skills and work history from résumés"
)]
pub struct Cli {
    /// Also append logs to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse one PDF, DOCX or text résumé and print JSON to stdout.
    Parse(ParseArgs),
    /// Parse every résumé in a directory and write a combined report.
    Batch(BatchArgs),
    /// Summarise a report written by `batch`.
    Report(ReportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    pub file_path: PathBuf,

    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub compact: bool,

    #[arg(long, default_value_t = false)]
    pub with_cleaned_content: bool,
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    pub folder_path: PathBuf,

    #[arg(short, long, default_value = "extracted_resume_data.json")]
    pub output: PathBuf,

    /// Worker threads; defaults to the config value.
    #[arg(short, long)]
    pub workers: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub with_cleaned_content: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    pub report_path: PathBuf,
}
