//! Per-file pipeline: load text, run every extractor, assemble a [`Candidate`].

use std::path::Path;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::cleaning::{clean_content, ExtractedContact};
use crate::config::ParserConfig;
use crate::contact::{
    extract_emails, extract_linkedin, extract_name, extract_phone_numbers, extract_urls, split_name,
};
use crate::document::{load_text, DocumentKind};
use crate::entities::{EntityRecognizer, RuleRecognizer};
use crate::experience::{extract_work_experience, total_experience};
use crate::model::Candidate;
use crate::profile::{extract_education, extract_skills};
use crate::sections::{split_into_sections, SectionKind};
use crate::util::file_name_of;

pub struct ResumeParser {
    config: ParserConfig,
    recognizer: Box<dyn EntityRecognizer>,
    today: NaiveDate,
}

impl ResumeParser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            recognizer: Box::new(RuleRecognizer),
            today: Local::now().date_naive(),
        }
    }

    pub fn with_recognizer(mut self, recognizer: Box<dyn EntityRecognizer>) -> Self {
        self.recognizer = recognizer;
        self
    }

    /// Fixes the date that open-ended ranges ("Present") resolve to.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn parse_file(&self, path: &Path) -> Result<Candidate> {
        let document = load_text(path, self.config.min_text_chars)?;

        let mut candidate = self.parse_text(&document.text, Some(document.kind));
        candidate.source_file = Some(file_name_of(path));

        info!(
            path = %path.display(),
            jobs = candidate.work_experiences.len(),
            skills = candidate.skills.len(),
            "parsed resume"
        );
        Ok(candidate)
    }

    pub fn parse_text(&self, text: &str, kind: Option<DocumentKind>) -> Candidate {
        let recognizer = self.recognizer.as_ref();

        let name = extract_name(text, recognizer, self.config.name_scan_lines);
        if name.is_none() {
            debug!("no candidate name found");
        }
        let (first_name, last_name) = name
            .as_deref()
            .map(split_name)
            .unwrap_or((None, None));

        let mut sections = split_into_sections(text, self.config.max_header_words);
        debug!(sections = ?sections.keys().collect::<Vec<_>>(), "split sections");
        let summary = sections.remove(&SectionKind::Summary);

        let emails = extract_emails(text);
        let phone_numbers = extract_phone_numbers(text);
        let linkedin = extract_linkedin(text);
        let urls = extract_urls(text);
        let education = extract_education(text);
        let skills = extract_skills(text);
        debug!(
            emails = emails.len(),
            phones = phone_numbers.len(),
            urls = urls.len(),
            education = education.len(),
            skills = skills.len(),
            "extracted profile fields"
        );

        let work_experiences = extract_work_experience(
            text,
            self.today,
            recognizer,
            self.config.company_lookahead,
            self.config.max_header_words,
        );
        let total_experience_years = total_experience(&work_experiences);

        let cleaned_content = self.config.include_cleaned_content.then(|| {
            clean_content(
                text,
                &ExtractedContact {
                    first_name: first_name.as_deref(),
                    last_name: last_name.as_deref(),
                    emails: &emails,
                    phones: &phone_numbers,
                    linkedin: &linkedin,
                },
            )
        });

        Candidate {
            source_file: None,
            source_kind: kind,
            name,
            first_name,
            last_name,
            summary,
            emails,
            phone_numbers,
            linkedin,
            urls,
            education,
            skills,
            work_experiences,
            total_experience_years,
            cleaned_content,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use super::*;
    use crate::entities::{Entity, EntityLabel};
    use crate::experience::UNKNOWN_TITLE;

    pub(crate) const SAMPLE_RESUME: &str = "\
Jane Q. Doe
Seattle, WA | jane.doe@corp.io | (206) 555-0142
linkedin.com/in/janedoe | https://janedoe.dev

Professional Summary
Backend engineer focused on data platforms.

Work Experience
Senior Data Engineer  Mar 2021 - Present
Initech, Seattle WA
• Built streaming ingestion on Kafka
• Led migration to Postgres 15
Data Analyst | Globex Corporation  Jun 2018 - Feb 2021
- Designed reporting dashboards

Education
University of Washington
B.S. Statistics, 2018
GPA: 3.7

Skills
Python, SQL, Rust
Kafka; Airflow
";

    pub(crate) fn fixed_parser(config: ParserConfig) -> ResumeParser {
        ResumeParser::new(config)
            .with_today(NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date"))
    }

    #[test]
    fn sample_resume_is_fully_extracted() {
        let candidate = fixed_parser(ParserConfig::default()).parse_text(SAMPLE_RESUME, None);

        assert_eq!(candidate.name.as_deref(), Some("Jane Q. Doe"));
        assert_eq!(candidate.first_name.as_deref(), Some("Jane"));
        assert_eq!(candidate.last_name.as_deref(), Some("Doe"));
        assert_eq!(
            candidate.summary.as_deref(),
            Some("Backend engineer focused on data platforms.")
        );
        assert_eq!(candidate.emails, vec!["jane.doe@corp.io"]);
        assert_eq!(candidate.phone_numbers, vec!["(206) 555-0142"]);
        assert_eq!(candidate.linkedin, vec!["https://linkedin.com/in/janedoe"]);
        assert!(candidate.urls.contains(&"https://janedoe.dev".to_string()));
        assert_eq!(
            candidate.education,
            vec!["University of Washington", "B.S. Statistics, 2018", "GPA: 3.7"]
        );
        assert_eq!(candidate.skills, vec!["Python", "SQL", "Rust", "Kafka", "Airflow"]);

        let jobs = &candidate.work_experiences;
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].job_title, "Senior Data Engineer");
        assert_eq!(jobs[0].company, "Initech");
        assert_eq!(jobs[0].duration_months, 48.0);
        assert!(jobs[0].is_current);
        assert_eq!(jobs[1].job_title, "Data Analyst");
        assert_eq!(jobs[1].company, "Globex Corporation");
        assert_eq!(jobs[1].duration_months, 32.0);
        assert_eq!(candidate.total_experience_years, 6.67);
        assert!(candidate.cleaned_content.is_none());
    }

    #[test]
    fn cleaned_content_is_opt_in() {
        let config = ParserConfig {
            include_cleaned_content: true,
            ..ParserConfig::default()
        };
        let candidate = fixed_parser(config).parse_text(SAMPLE_RESUME, None);
        let cleaned = candidate.cleaned_content.expect("cleaned content requested");

        assert!(!cleaned.contains("jane.doe@corp.io"));
        assert!(!cleaned.contains("555-0142"));
        assert!(!cleaned.contains("Jane"));
        assert!(cleaned.contains("Initech"));
    }

    struct FixedTitles;

    impl EntityRecognizer for FixedTitles {
        fn recognize(&self, _text: &str) -> Vec<Entity> {
            vec![Entity {
                label: EntityLabel::Title,
                text: "Wizard".to_string(),
            }]
        }
    }

    #[test]
    fn recognizer_is_pluggable() {
        let parser = fixed_parser(ParserConfig::default()).with_recognizer(Box::new(FixedTitles));
        let candidate = parser.parse_text("Experience\n2019 - 2020\n", None);

        assert_eq!(candidate.work_experiences[0].job_title, "Wizard");
        assert_ne!(candidate.work_experiences[0].job_title, UNKNOWN_TITLE);
    }

    #[test]
    fn empty_text_yields_defaults() {
        let candidate = fixed_parser(ParserConfig::default()).parse_text("", None);
        assert_eq!(candidate.name, None);
        assert_eq!(candidate.summary, None);
        assert!(candidate.emails.is_empty());
        assert!(candidate.work_experiences.is_empty());
        assert_eq!(candidate.total_experience_years, 0.0);
    }

    #[test]
    fn parse_file_records_source() {
        let mut file = tempfile::Builder::new()
            .prefix("jane")
            .suffix(".txt")
            .tempfile()
            .expect("temp file");
        file.write_all(SAMPLE_RESUME.as_bytes()).expect("write");

        let candidate = fixed_parser(ParserConfig::default())
            .parse_file(file.path())
            .expect("parses");
        assert_eq!(candidate.source_kind, Some(DocumentKind::PlainText));
        assert!(candidate
            .source_file
            .as_deref()
            .is_some_and(|name| name.starts_with("jane") && name.ends_with(".txt")));
    }
}
