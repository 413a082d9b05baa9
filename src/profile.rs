//! Education and skills extraction.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::entities::mentions_job_title;
use crate::text::{dedup_preserving_order, strip_bullet, word_count};

static INSTITUTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:university|college|institute)\b").expect("valid institution regex")
});

static OF_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bof\b").expect("valid of regex"));

static DEGREE_WITH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:^|[^a-z])(?:b\.?s|b\.?a|m\.?s|m\.?a|ph\.?d|mba|bachelor'?s?|master'?s?)(?:[^a-z]|$).*\b(?:19|20)\d{2}\b",
    )
    .expect("valid degree regex")
});

static GPA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bgpa\b").expect("valid gpa regex"));

static HONOURS_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bdean.*list\b|\bchancellor.*list\b").expect("valid honours regex")
});

const SHORT_INSTITUTION_LINE_WORDS: usize = 8;

/// Lines that look like schools, degrees, GPAs or honours lists.
pub fn extract_education(text: &str) -> Vec<String> {
    let mut education = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // Employer lines ("Engineer, Allen Institute") are not schooling.
        let institution = INSTITUTION.is_match(line)
            && (OF_WORD.is_match(line) || word_count(line) <= SHORT_INSTITUTION_LINE_WORDS)
            && !mentions_job_title(line);

        if institution
            || DEGREE_WITH_YEAR.is_match(line)
            || GPA.is_match(line)
            || HONOURS_LIST.is_match(line)
        {
            education.push(line.to_string());
        }
    }

    let mut seen = HashSet::new();
    education.retain(|line| seen.insert(line.clone()));
    education
}

static SKILLS_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(?:technical\s+)?skills?|core\s+competencies)\s*(?::\s*(.*))?$")
        .expect("valid skills header regex")
});

static SKILLS_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:experience|work\s+experience|professional\s+experience|employment|education|projects|certifications|summary|objective)",
    )
    .expect("valid skills end regex")
});

static SKILL_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;|•]").expect("valid separator regex"));

fn char_len_between(value: &str, min_exclusive: usize, max_exclusive: usize) -> bool {
    let len = value.chars().count();
    len > min_exclusive && len < max_exclusive
}

fn push_skill_items(line: &str, skills: &mut Vec<String>) {
    let line = strip_bullet(line).trim();
    if line.chars().count() <= 2 {
        return;
    }
    for item in SKILL_SEPARATORS.split(line) {
        let item = item.trim();
        if char_len_between(item, 2, 50) {
            skills.push(item.to_string());
        }
    }
}

/// Items listed under a skills heading, or failing that, any short
/// comma-separated list in the document.
pub fn extract_skills(text: &str) -> Vec<String> {
    let mut skills = Vec::new();
    let mut in_section = false;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(captures) = SKILLS_HEADER.captures(line) {
            in_section = true;
            if let Some(inline) = captures.get(1).filter(|m| !m.as_str().is_empty()) {
                push_skill_items(inline.as_str(), &mut skills);
            }
            continue;
        }
        if in_section && SKILLS_END.is_match(line) {
            break;
        }
        if in_section {
            push_skill_items(line, &mut skills);
        }
    }

    if skills.is_empty() {
        for line in text.lines() {
            if line.matches(',').count() < 2 || line.chars().count() >= 200 {
                continue;
            }
            let items: Vec<&str> = line.split(',').collect();
            if items.len() < 3 {
                continue;
            }
            for item in items {
                let item = strip_bullet(item).trim();
                if char_len_between(item, 2, 30) {
                    skills.push(item.to_string());
                }
            }
        }
    }

    dedup_preserving_order(skills)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn education_lines_are_recognized() {
        let text = "University of Texas at Austin\n\
            Stanford University\n\
            Bachelor of Science in Physics (2014)\n\
            B.S. Computer Science, May 2016\n\
            GPA: 3.8/4.0\n\
            Dean's List, four semesters\n\
            Managed a team of five\n\
            University of Texas at Austin\n";

        assert_eq!(
            extract_education(text),
            vec![
                "University of Texas at Austin",
                "Stanford University",
                "Bachelor of Science in Physics (2014)",
                "B.S. Computer Science, May 2016",
                "GPA: 3.8/4.0",
                "Dean's List, four semesters",
            ]
        );
    }

    #[test]
    fn employer_lines_are_not_education() {
        let text = "Software Engineer, Allen Institute\n\
            Research Assistant, University of Oregon\n\
            Stanford University\n";
        assert_eq!(extract_education(text), vec!["Stanford University"]);
    }

    #[test]
    fn degree_without_year_is_ignored() {
        assert!(extract_education("MBA candidate").is_empty());
        assert!(extract_education("Worked in mass spectrometry since 2019").is_empty());
    }

    #[test]
    fn skills_section_items_are_split_and_filtered() {
        let text = "Skills\n\
            • Rust, Go; TypeScript | C\n\
            - Kubernetes\n\
            Experience\n\
            Engineer at Acme, Inc, Springfield\n";

        assert_eq!(extract_skills(text), vec!["Rust", "TypeScript", "Kubernetes"]);
    }

    #[test]
    fn inline_skills_header_counts() {
        let text = "Technical Skills: Python, SQL, Airflow\nEducation\nMIT";
        assert_eq!(extract_skills(text), vec!["Python", "SQL", "Airflow"]);
    }

    #[test]
    fn comma_lists_are_a_fallback() {
        let text = "Jane Doe\nPython, Pandas, NumPy, python\nSeattle, WA";
        assert_eq!(extract_skills(text), vec!["Python", "Pandas", "NumPy"]);
    }

    #[test]
    fn no_skills_anywhere_is_empty() {
        assert!(extract_skills("Jane Doe\nSeattle\n").is_empty());
    }
}
