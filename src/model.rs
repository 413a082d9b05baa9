use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::DocumentKind;
use crate::experience::JobEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_kind: Option<DocumentKind>,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub emails: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub linkedin: Vec<String>,
    pub urls: Vec<String>,
    pub education: Vec<String>,
    pub skills: Vec<String>,
    pub work_experiences: Vec<JobEntry>,
    pub total_experience_years: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleaned_content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMetadata {
    pub extraction_date: String,
    pub total_resumes: usize,
    pub successful_extractions: usize,
    pub failed_extractions: usize,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedFile {
    pub path: String,
    pub error: String,
}

/// Output of a directory run, keyed by file name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub metadata: BatchMetadata,
    pub resumes: BTreeMap<String, Candidate>,
    #[serde(default)]
    pub failed_files: Vec<FailedFile>,
}
