use std::collections::HashSet;
use std::sync::LazyLock;

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any",
        "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
        "both", "but", "by", "can", "did", "do", "does", "doing", "down", "during", "each",
        "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
        "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it",
        "its", "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not",
        "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves",
        "out", "over", "own", "same", "she", "should", "so", "some", "such", "than", "that",
        "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they",
        "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "we",
        "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will",
        "with", "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

const BULLETS: &[char] = &['•', '*', '-', '▪', '▫', '◦', '‣', '⁃', '●', '➤', '→'];

/// Lowercased alphabetic word tokens with English stop words removed.
pub fn preprocess(line: &str) -> Vec<String> {
    line.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .filter(|token| token.chars().all(char::is_alphabetic))
        .filter(|token| !STOP_WORDS.contains(token))
        .map(ToOwned::to_owned)
        .collect()
}

pub fn normalize_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn strip_bullet(line: &str) -> &str {
    line.trim_start()
        .trim_start_matches(BULLETS)
        .trim_start()
}

pub fn starts_with_bullet(line: &str) -> bool {
    line.trim_start().starts_with(BULLETS)
}

pub fn word_count(value: &str) -> usize {
    value.split_whitespace().count()
}

/// Case-insensitive dedup that keeps the first spelling seen.
pub fn dedup_preserving_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}
