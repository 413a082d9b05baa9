use std::sync::LazyLock;

use regex::Regex;

static CONTACT_HEADERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)contact\s*information|personal\s*information|contact\s*details?|phone:|email:|linkedin:|address:|location:",
    )
    .expect("valid contact header regex")
});

static BULLET_MARKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[•▪▫◦‣⁃●]\s*|[-*+]\s+").expect("valid bullet regex"));

static LIST_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[,;]\s*").expect("valid separator regex"));

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s,.\-()&/]").expect("valid charset regex"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Values already pulled out of the document, removed from the residue.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtractedContact<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub emails: &'a [String],
    pub phones: &'a [String],
    pub linkedin: &'a [String],
}

/// Document text without contact details, bullets and stray symbols,
/// flattened to a single line.
pub fn clean_content(text: &str, contact: &ExtractedContact<'_>) -> String {
    let mut content = text.to_string();

    // Emails were lowercased on extraction, so match them case-insensitively.
    for email in contact.emails {
        if let Ok(pattern) = Regex::new(&format!("(?i){}", regex::escape(email))) {
            content = pattern.replace_all(&content, "").into_owned();
        }
    }
    for phone in contact.phones {
        content = content.replace(phone.as_str(), "");
    }
    // LinkedIn URLs gained an https:// prefix on extraction.
    for url in contact.linkedin {
        content = content.replace(url.as_str(), "");
        content = content.replace(url.trim_start_matches("https://"), "");
    }

    for part in [contact.first_name, contact.last_name].into_iter().flatten() {
        if part.is_empty() {
            continue;
        }
        if let Ok(pattern) = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(part))) {
            content = pattern.replace_all(&content, "").into_owned();
        }
    }

    let content = CONTACT_HEADERS.replace_all(&content, "");
    let content = BULLET_MARKS.replace_all(&content, "");
    let content = LIST_SEPARATORS.replace_all(&content, ", ");
    let content = DISALLOWED.replace_all(&content, " ");
    let content = WHITESPACE.replace_all(&content, " ");

    content.trim().trim_matches(',').trim().to_string()
}
