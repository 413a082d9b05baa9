mod cleaning;
mod cli;
mod commands;
mod config;
mod contact;
mod document;
mod entities;
mod experience;
mod model;
mod parser;
mod profile;
mod sections;
mod text;
mod util;

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::{Cli, Commands};
use crate::util::ensure_parent_directory;

fn main() {
    let cli = Cli::parse();

    let (log_file, log_error) = match cli.log_file.as_deref().map(open_log_file).transpose() {
        Ok(file) => (file, None),
        Err(err) => (None, Some(err)),
    };
    init_tracing(log_file);

    let result = match log_error {
        Some(err) => Err(err),
        None => run(cli.command),
    };
    if let Err(err) = result {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Parse(args) => commands::parse::run(args),
        Commands::Batch(args) => commands::batch::run(args),
        Commands::Report(args) => commands::report::run(args),
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    ensure_parent_directory(path)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file: {}", path.display()))
}

/// Logs go to stderr, and also to `log_file` when one is given.
fn init_tracing(log_file: Option<File>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = log_file.map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Write;

    use super::*;

    #[test]
    fn log_file_is_created_and_appended_to() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("logs").join("resume_parser.log");

        writeln!(open_log_file(&path).expect("opens"), "first").expect("write");
        writeln!(open_log_file(&path).expect("reopens"), "second").expect("write");

        assert_eq!(fs::read_to_string(&path).expect("read log"), "first\nsecond\n");
    }
}
