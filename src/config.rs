use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Tunables for the extraction heuristics and batch runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Non-empty lines at the top of the document searched for the name.
    pub name_scan_lines: usize,
    /// Documents with less trimmed text than this are rejected.
    pub min_text_chars: usize,
    /// Lines after a date line searched for the company.
    pub company_lookahead: usize,
    /// Longer lines are never treated as section headers.
    pub max_header_words: usize,
    pub include_cleaned_content: bool,
    pub workers: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            name_scan_lines: 30,
            min_text_chars: 10,
            company_lookahead: 2,
            max_header_words: 4,
            include_cleaned_content: false,
            workers: 4,
        }
    }
}

impl ParserConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
