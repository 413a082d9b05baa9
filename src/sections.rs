use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::text::{preprocess, word_count};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Education,
    Experience,
    Skills,
    Projects,
    Certifications,
    Summary,
}

impl SectionKind {
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Education,
        SectionKind::Experience,
        SectionKind::Skills,
        SectionKind::Projects,
        SectionKind::Certifications,
        SectionKind::Summary,
    ];

    /// The first keyword is the primary one; it wins over any other
    /// section's secondary keywords ("Professional Summary" is a summary).
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Education => &["education", "academic", "background", "qualifications"],
            Self::Experience => &["experience", "work", "professional", "employment", "career"],
            Self::Skills => &["skills", "skill", "technical", "core", "competencies"],
            Self::Projects => &["projects", "personal"],
            Self::Certifications => &["certifications", "licenses", "certificates"],
            Self::Summary => &["summary", "profile", "objective"],
        }
    }
}

/// Section named by a set of preprocessed tokens, primary keywords first.
pub fn section_for_tokens(tokens: &[String]) -> Option<SectionKind> {
    let has = |keyword: &str| tokens.iter().any(|token| token == keyword);

    SectionKind::ALL
        .into_iter()
        .find(|kind| has(kind.keywords()[0]))
        .or_else(|| {
            SectionKind::ALL
                .into_iter()
                .find(|kind| kind.keywords()[1..].iter().any(|keyword| has(keyword)))
        })
}

pub fn is_section_header(line: &str, max_header_words: usize) -> Option<SectionKind> {
    let line = line.trim();
    if line.is_empty() || word_count(line) > max_header_words {
        return None;
    }
    section_for_tokens(&preprocess(line))
}

/// Splits text into sections at header lines. Text before the first
/// header is dropped; a section seen twice is appended to.
pub fn split_into_sections(text: &str, max_header_words: usize) -> BTreeMap<SectionKind, String> {
    let mut sections: BTreeMap<SectionKind, Vec<&str>> = BTreeMap::new();
    let mut current = None;

    for line in text.lines() {
        if let Some(kind) = is_section_header(line, max_header_words) {
            current = Some(kind);
            sections.entry(kind).or_default();
            continue;
        }
        if let Some(kind) = current {
            sections.entry(kind).or_default().push(line);
        }
    }

    sections
        .into_iter()
        .filter_map(|(kind, lines)| {
            let body = lines.join("\n").trim().to_string();
            (!body.is_empty()).then_some((kind, body))
        })
        .collect()
}

static EXPERIENCE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        work[\s*\[\]]*experience
        | professional[\s*\[\]]*experience
        | employment[\s*\[\]]*history
        | career[\s*\[\]]*history
        | experience[\s*\[\]]*:
        | ^[\s*\[]*experience[\s*\]]*$",
    )
    .expect("valid experience header regex")
});

static SECTION_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        education
        | technical[\s*\[\]]*skills
        | ^[\s*\[]*skills[\s*\]]*:?
        | projects
        | certifications?
        | summary
        | objective
        | achievements?
        | awards?",
    )
    .expect("valid section end regex")
});

/// Non-empty lines under experience headings, up to the next unrelated
/// heading. Several experience blocks are concatenated.
pub fn extract_experience_section(text: &str, max_header_words: usize) -> Option<String> {
    let mut recorded = Vec::new();
    let mut recording = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let header_like = word_count(trimmed) <= max_header_words;

        if header_like && EXPERIENCE_HEADER.is_match(trimmed) {
            recording = true;
            continue;
        }
        if recording && header_like && SECTION_END.is_match(trimmed) {
            recording = false;
            continue;
        }
        if recording {
            recorded.push(line);
        }
    }

    (!recorded.is_empty()).then(|| recorded.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Doe\n\
        jane@doe.dev\n\
        Professional Summary\n\
        Backend engineer with a taste for reliable systems.\n\
        Work Experience\n\
        Senior Engineer  Jan 2020 - Present\n\
        Initech\n\
        - Led projects for payments\n\
        Education\n\
        B.S. Computer Science, 2015\n\
        Technical Skills\n\
        Rust, Go, PostgreSQL\n";

    #[test]
    fn headers_prefer_primary_keywords() {
        assert_eq!(is_section_header("Professional Summary", 4), Some(SectionKind::Summary));
        assert_eq!(is_section_header("WORK HISTORY", 4), Some(SectionKind::Experience));
        assert_eq!(is_section_header("Technical Skills:", 4), Some(SectionKind::Skills));
        assert_eq!(is_section_header("Academic Background", 4), Some(SectionKind::Education));
        assert_eq!(
            is_section_header("Licenses & Certifications", 4),
            Some(SectionKind::Certifications)
        );
    }

    #[test]
    fn long_lines_are_not_headers() {
        assert_eq!(
            is_section_header("Eight years of professional experience in fintech", 4),
            None
        );
    }

    #[test]
    fn split_collects_bodies_per_section() {
        let sections = split_into_sections(RESUME, 4);
        assert_eq!(
            sections.get(&SectionKind::Summary).map(String::as_str),
            Some("Backend engineer with a taste for reliable systems.")
        );
        assert!(sections[&SectionKind::Experience].starts_with("Senior Engineer"));
        assert_eq!(sections[&SectionKind::Skills], "Rust, Go, PostgreSQL");
        assert!(!sections.values().any(|body| body.contains("jane@doe.dev")));
    }

    #[test]
    fn experience_section_stops_at_next_heading_only() {
        let section = extract_experience_section(RESUME, 4).expect("section found");
        let lines: Vec<&str> = section.lines().collect();
        assert_eq!(
            lines,
            vec!["Senior Engineer  Jan 2020 - Present", "Initech", "- Led projects for payments"]
        );
    }

    #[test]
    fn experience_blocks_can_resume() {
        let text = "Experience\nAcme  2018 - 2019\nAwards\nBest intern\nExperience:\nGlobex  2019 - 2021\n";
        let section = extract_experience_section(text, 4).expect("section found");
        assert_eq!(section, "Acme  2018 - 2019\nGlobex  2019 - 2021");
    }

    #[test]
    fn missing_experience_section_is_none() {
        assert_eq!(extract_experience_section("Jane Doe\nEducation\nMIT", 4), None);
    }
}
