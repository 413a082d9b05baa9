//! Lightweight entity recognition for names, organisations and job titles.
//!
//! [`RuleRecognizer`] works from capitalisation shape and small vocabularies.
//! Anything implementing [`EntityRecognizer`] can stand in for it, which is
//! where a statistical model would plug in.

use std::sync::LazyLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    Person,
    Organization,
    Title,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub label: EntityLabel,
    pub text: String,
}

pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Vec<Entity>;

    fn first(&self, text: &str, label: EntityLabel) -> Option<String> {
        self.recognize(text)
            .into_iter()
            .find(|entity| entity.label == label)
            .map(|entity| entity.text)
    }
}

const ORG_SUFFIXES: &[&str] = &[
    "inc", "llc", "llp", "ltd", "limited", "corp", "corporation", "company", "co", "group",
    "technologies", "technology", "solutions", "systems", "labs", "bank", "gmbh", "plc", "ag",
    "partners", "consulting", "services", "software", "holdings", "industries", "agency",
];

const ORG_MARKERS: &[&str] = &["university", "college", "institute", "school", "hospital"];

const TITLE_WORDS: &[&str] = &[
    "engineer", "developer", "manager", "analyst", "scientist", "consultant", "designer",
    "architect", "intern", "director", "specialist", "administrator", "lead", "coordinator",
    "officer", "associate", "assistant", "technician", "recruiter", "accountant", "programmer",
    "president", "executive", "representative", "supervisor", "head",
];

const NOT_A_NAME: &[&str] = &[
    "resume", "curriculum", "vitae", "summary", "profile", "objective", "experience",
    "education", "skills", "projects", "certifications", "contact", "phone", "email", "address",
    "linkedin", "github", "references", "professional", "technical", "work", "employment",
    "history", "present", "street", "avenue", "road", "remote", "january", "february", "march",
    "april", "june", "july", "august", "september", "october", "november", "december",
];

/// Whether any word of `text` is job-title vocabulary.
pub fn mentions_job_title(text: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|word| TITLE_WORDS.contains(&word.to_lowercase().as_str()))
}

static CAPITALIZED_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][A-Za-z&'.\-]*(?:[ \t]+(?:(?:of|and|for|the)\b|&|[A-Z][A-Za-z&'.\-]*))*")
        .expect("valid capitalized-run regex")
});

static PERSON_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-z]+(?:-[A-Z][a-z]+)?(?:[ \t]+[A-Z]\.?)?(?:[ \t]+[A-Z][a-z]+(?:-[A-Z][a-z]+)?){1,3}$")
        .expect("valid person regex")
});

/// Shape- and vocabulary-based recognizer; works line by line.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleRecognizer;

impl RuleRecognizer {
    fn classify(span: &str) -> Option<EntityLabel> {
        let words: Vec<String> = span
            .split_whitespace()
            .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        let last = words.last()?;

        if words.iter().any(|word| TITLE_WORDS.contains(&word.as_str())) {
            return Some(EntityLabel::Title);
        }
        if (words.len() >= 2 && ORG_SUFFIXES.contains(&last.as_str()))
            || words.iter().any(|word| ORG_MARKERS.contains(&word.as_str()))
        {
            return Some(EntityLabel::Organization);
        }
        if PERSON_SHAPE.is_match(span)
            && words.len() <= 4
            && !words.iter().any(|word| NOT_A_NAME.contains(&word.as_str()))
        {
            return Some(EntityLabel::Person);
        }
        None
    }
}

impl EntityRecognizer for RuleRecognizer {
    fn recognize(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();
        for line in text.lines() {
            if line.contains('@') || line.contains("://") || line.contains("www.") {
                continue;
            }
            for candidate in CAPITALIZED_RUN.find_iter(line) {
                let span = candidate
                    .as_str()
                    .trim_end_matches(|c: char| !c.is_alphanumeric() && c != '.')
                    .trim_end_matches(" of")
                    .trim_end_matches(" and")
                    .trim();
                if span.is_empty() {
                    continue;
                }
                if let Some(label) = Self::classify(span) {
                    entities.push(Entity {
                        label,
                        text: span.to_string(),
                    });
                }
            }
        }
        entities
    }
}
