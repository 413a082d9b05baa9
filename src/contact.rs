//! Name, email, phone and URL extraction.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::entities::{EntityLabel, EntityRecognizer};
use crate::sections::section_for_tokens;
use crate::text::{dedup_preserving_order, preprocess, word_count};

static NAME_FALLBACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:[ \t][A-Z][a-z]+)+\b").expect("valid name regex")
});

const NAME_SUFFIXES: &[&str] = &["Jr", "Sr", "II", "III", "IV"];

const DOCUMENT_TITLES: &[&str] = &["resume", "curriculum", "vitae", "cv"];

/// Best guess at the candidate's name from the top of the document.
pub fn extract_name(
    text: &str,
    recognizer: &dyn EntityRecognizer,
    scan_lines: usize,
) -> Option<String> {
    let top: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(scan_lines)
        .collect();

    let person = recognizer
        .recognize(&top.join("\n"))
        .into_iter()
        .find(|entity| entity.label == EntityLabel::Person && word_count(&entity.text) <= 3);
    if let Some(person) = person {
        return Some(person.text);
    }

    top.iter()
        .flat_map(|line| NAME_FALLBACK.find_iter(line))
        .map(|m| m.as_str())
        .find(|candidate| {
            let tokens = preprocess(candidate);
            section_for_tokens(&tokens).is_none()
                && !tokens.iter().any(|token| DOCUMENT_TITLES.contains(&token.as_str()))
                && !recognizer.recognize(candidate).iter().any(|entity| {
                    matches!(entity.label, EntityLabel::Title | EntityLabel::Organization)
                })
        })
        .map(ToOwned::to_owned)
}

/// First and last name, ignoring generational suffixes and initials.
pub fn split_name(name: &str) -> (Option<String>, Option<String>) {
    let parts: Vec<&str> = name
        .split_whitespace()
        .map(|part| part.trim_end_matches(['.', ',']))
        .filter(|part| part.chars().count() > 1 && !NAME_SUFFIXES.contains(part))
        .collect();

    match parts.as_slice() {
        [] => (None, None),
        [only] => (Some((*only).to_string()), None),
        [first, .., last] => (Some((*first).to_string()), Some((*last).to_string())),
    }
}

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});

static PLACEHOLDER_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@(?:[a-z0-9-]+\.)*(?:example|test|sample|dummy)\.com$")
        .expect("valid placeholder regex")
});

/// Lowercased addresses in order of appearance, placeholders removed.
pub fn extract_emails(text: &str) -> Vec<String> {
    let emails = EMAIL
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches('.').to_lowercase())
        .filter(|email| !PLACEHOLDER_EMAIL.is_match(email));
    dedup_preserving_order(emails)
}

static PHONE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\+\d{1,3}[ \t\-.]?\(?\d{3}\)?[ \t\-.]?\d{3}[ \t\-.]?\d{4}",
        r"\(\d{3}\)[ \t\-.]?\d{3}[ \t\-.]?\d{4}",
        r"\b\d{3}[ \t\-.]\d{3}[ \t\-.]\d{4}\b",
        r"\b\d{10}\b",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("valid phone regex"))
    .collect()
});

/// National ten-digit form of a candidate, or `None` when it should not
/// be reported as a phone number.
fn phone_digits(candidate: &str) -> Option<String> {
    let mut digits: String = candidate.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 11 && digits.starts_with('1') {
        digits.remove(0);
    }
    if digits.len() != 10 {
        return None;
    }

    let first = digits.chars().next()?;
    if matches!(first, '0' | '1') || digits.chars().all(|c| c == first) {
        return None;
    }
    Some(digits)
}

/// Numbers in original formatting, ordered by position, one per number.
pub fn extract_phone_numbers(text: &str) -> Vec<String> {
    let mut candidates: Vec<(usize, &str)> = PHONE_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.find_iter(text))
        .map(|m| (m.start(), m.as_str()))
        .collect();
    candidates.sort_by_key(|(start, _)| *start);

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter_map(|(_, candidate)| {
            let digits = phone_digits(candidate)?;
            seen.insert(digits).then(|| candidate.trim().to_string())
        })
        .collect()
}

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:(?i:https?://|www\.)[^\s<>()"']+)|\b[a-z0-9][a-z0-9\-]*(?:\.[a-z0-9\-]+)*\.(?:com|org|net|io|dev|edu|gov|co|ai|me|info|app|us|uk|ca|in)\b(?:/[^\s<>()"']*)?"#,
    )
    .expect("valid url regex")
});

fn overlaps(span: &Range<usize>, others: &[Range<usize>]) -> bool {
    others
        .iter()
        .any(|other| span.start < other.end && other.start < span.end)
}

/// URL-like tokens other than email addresses.
pub fn extract_urls(text: &str) -> Vec<String> {
    let email_spans: Vec<Range<usize>> = EMAIL.find_iter(text).map(|m| m.range()).collect();

    let urls = URL
        .find_iter(text)
        .filter(|m| !overlaps(&m.range(), &email_spans))
        .map(|m| {
            m.as_str()
                .trim_end_matches(['.', ',', ';', ':', '!', '?'])
                .to_string()
        });
    dedup_preserving_order(urls)
}

static LINKEDIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/in/[\w\-]+/?").expect("valid linkedin regex")
});

/// LinkedIn profile URLs normalised to an `https://` prefix.
pub fn extract_linkedin(text: &str) -> Vec<String> {
    let urls = LINKEDIN.find_iter(text).map(|m| {
        let url = m.as_str().trim_end_matches('/');
        if url.to_ascii_lowercase().starts_with("http") {
            url.to_string()
        } else {
            format!("https://{url}")
        }
    });
    dedup_preserving_order(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::RuleRecognizer;

    #[test]
    fn name_comes_from_top_lines() {
        let text = "\n  RESUME\nJane Q. Doe\nSoftware Engineer\njane@doe.dev\n";
        assert_eq!(extract_name(text, &RuleRecognizer, 30), Some("Jane Q. Doe".to_string()));
    }

    #[test]
    fn name_falls_back_to_capitalized_pair() {
        // Four capitalised words are too long for a person entity.
        let text = "Curriculum Vitae\nAnna Maria Lopez Garcia 555-0100\n";
        assert_eq!(
            extract_name(text, &RuleRecognizer, 30),
            Some("Anna Maria Lopez Garcia".to_string())
        );
    }

    #[test]
    fn name_fallback_skips_titles_and_organisations() {
        let text = "JANE DOE\nSenior Data Engineer\nAcme Solutions\n";
        assert_eq!(extract_name(text, &RuleRecognizer, 30), None);
    }

    #[test]
    fn name_scan_is_limited() {
        let text = "Summary\nBuilt things\nJohn Smith";
        assert_eq!(extract_name(text, &RuleRecognizer, 2), None);
    }

    #[test]
    fn split_name_skips_initials_and_suffixes() {
        assert_eq!(
            split_name("John A. Smith Jr."),
            (Some("John".to_string()), Some("Smith".to_string()))
        );
        assert_eq!(split_name("Cher"), (Some("Cher".to_string()), None));
        assert_eq!(split_name(""), (None, None));
    }

    #[test]
    fn emails_are_lowercased_deduped_and_filtered() {
        let text = "Jane.Doe@Corp.io | jane.doe@corp.io\nfake@example.com\nalt: jd+cv@mail.co.uk.";
        assert_eq!(extract_emails(text), vec!["jane.doe@corp.io", "jd+cv@mail.co.uk"]);
    }

    #[test]
    fn phone_formats_are_accepted_once_each() {
        let text = "Phone: +1 (415) 555-2671\nAlt 415.555.2671\nCell 212 555 0199, 6175550123";
        assert_eq!(
            extract_phone_numbers(text),
            vec!["+1 (415) 555-2671", "212 555 0199", "6175550123"]
        );
    }

    #[test]
    fn implausible_numbers_are_rejected() {
        let text = "ID 0123456789\nzip 1234567890\n5555555555\n2019 2020 1234";
        assert!(extract_phone_numbers(text).is_empty());
    }

    #[test]
    fn year_ranges_never_form_phone_numbers() {
        let text = "Acme 2019-2020, 1998 2004 2012\nJan 2015 - Dec 2018 2019";
        assert!(extract_phone_numbers(text).is_empty());
    }

    #[test]
    fn urls_exclude_emails_and_trim_punctuation() {
        let text = "Site: https://jane.dev/blog, repo github.com/jane/tools.\nMail jane@corp.io\nwww.Portfolio.net";
        assert_eq!(
            extract_urls(text),
            vec!["https://jane.dev/blog", "github.com/jane/tools", "www.Portfolio.net"]
        );
    }

    #[test]
    fn linkedin_is_normalized() {
        let text = "linkedin.com/in/jane-doe/ and https://www.linkedin.com/in/jdoe";
        assert_eq!(
            extract_linkedin(text),
            vec!["https://linkedin.com/in/jane-doe", "https://www.linkedin.com/in/jdoe"]
        );
    }
}
