pub mod batch;
pub mod parse;
pub mod report;

use std::path::Path;

use anyhow::Result;

use crate::config::ParserConfig;

/// Config file (if any) with command-line overrides applied.
fn resolve_config(path: Option<&Path>, with_cleaned_content: bool) -> Result<ParserConfig> {
    let mut config = ParserConfig::load_or_default(path)?;
    if with_cleaned_content {
        config.include_cleaned_content = true;
    }
    Ok(config)
}
