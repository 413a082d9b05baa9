use std::io::{self, Write};

use anyhow::{Context, Result};

use crate::cli::ParseArgs;
use crate::parser::ResumeParser;

pub fn run(args: ParseArgs) -> Result<()> {
    let config = super::resolve_config(args.config.as_deref(), args.with_cleaned_content)?;
    let parser = ResumeParser::new(config);

    let candidate = parser
        .parse_file(&args.file_path)
        .with_context(|| format!("no text extracted from {}", args.file_path.display()))?;

    let json = if args.compact {
        serde_json::to_string(&candidate)
    } else {
        serde_json::to_string_pretty(&candidate)
    }
    .context("failed to serialize candidate")?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}").context("failed to write to stdout")?;
    Ok(())
}
