//! Work history: date ranges, durations, and title/company attribution.
//!
//! Every line carrying a date range (`Jan 2020 - Present`, `2018 – 2021`,
//! `03/2017 to 11/2019`) becomes one [`JobEntry`]. The job title is taken
//! from the text before the range on the same line, the company from the
//! next few lines; when either is missing the entity recognizer is asked
//! about the surrounding lines.

use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::entities::{EntityLabel, EntityRecognizer};
use crate::sections::extract_experience_section;
use crate::text::{normalize_whitespace, starts_with_bullet, strip_bullet, word_count};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_COMPANY: &str = "Unknown Company";
pub const PRESENT: &str = "Present";

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthYear {
    pub year: i32,
    pub month: u32,
}

impl MonthYear {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        ((1900..=2100).contains(&year) && (1..=12).contains(&month)).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Whole months from `self` to `later`; negative when `later` is earlier.
    pub fn months_until(&self, later: &MonthYear) -> i64 {
        i64::from(later.year - self.year) * 12 + i64::from(later.month) - i64::from(self.month)
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", MONTHS[(self.month - 1) as usize], self.year)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    Date(MonthYear),
    Present,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobEntry {
    pub job_title: String,
    pub company: String,
    pub duration_months: f64,
    pub from: String,
    pub to: String,
    pub is_current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_description: Option<String>,
}

static MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([a-z]{3})[a-z]*\.?,?\s+(\d{4})$").expect("valid month-year regex")
});

static NUMERIC_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{4})$").expect("valid numeric month-year regex")
});

/// Parses `Month YYYY`, `M/YYYY` or a bare `YYYY` (taken as January).
pub fn parse_month_year(value: &str) -> Option<MonthYear> {
    let value = value.trim();

    if let Some(captures) = MONTH_YEAR.captures(value) {
        let prefix = captures[1].to_ascii_lowercase();
        let month = MONTHS
            .iter()
            .position(|name| name.eq_ignore_ascii_case(&prefix))?;
        let year = captures[2].parse().ok()?;
        return MonthYear::new(year, month as u32 + 1);
    }

    if let Some(captures) = NUMERIC_MONTH_YEAR.captures(value) {
        let month = captures[1].parse().ok()?;
        let year = captures[2].parse().ok()?;
        return MonthYear::new(year, month);
    }

    if value.len() == 4 && value.chars().all(|c| c.is_ascii_digit()) {
        return MonthYear::new(value.parse().ok()?, 1);
    }

    None
}

const MONTH_NAME: &str = r"(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:tember)?|Sept|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\.?,?";
const RANGE_SEPARATOR: &str = r"\s*(?:--|[-–—]|\bto\b)\s*";
const OPEN_END: &str = r"(?:present|current|now|ongoing|today)\b";

static DATE_RANGES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let month_year = format!(r"\b{MONTH_NAME}\s+\d{{4}}");
    [
        format!(r"(?i)(?P<from>{month_year}){RANGE_SEPARATOR}(?P<to>{OPEN_END}|{month_year})"),
        format!(r"(?i)(?P<from>\b\d{{4}}){RANGE_SEPARATOR}(?P<to>{OPEN_END}|\d{{4}}\b)"),
        format!(r"(?i)(?P<from>\b\d{{1,2}}/\d{{4}}){RANGE_SEPARATOR}(?P<to>{OPEN_END}|\d{{1,2}}/\d{{4}}\b)"),
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid date range regex"))
    .collect()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRangeMatch {
    pub start: MonthYear,
    pub end: RangeEnd,
    /// Byte span of the whole range within the line.
    pub span: Range<usize>,
}

/// First parseable date range on a line. Month-name forms are tried
/// before year-only and numeric forms.
pub fn find_date_range(line: &str) -> Option<DateRangeMatch> {
    DATE_RANGES.iter().find_map(|pattern| {
        pattern.captures_iter(line).find_map(|captures| {
            let whole = captures.get(0)?;
            let start = parse_month_year(&captures["from"])?;
            let to = &captures["to"];
            let end = if to.chars().next()?.is_ascii_digit() || MONTH_YEAR.is_match(to.trim()) {
                RangeEnd::Date(parse_month_year(to)?)
            } else {
                RangeEnd::Present
            };
            Some(DateRangeMatch {
                start,
                end,
                span: whole.range(),
            })
        })
    })
}

const ACTION_VERBS: &[&str] = &[
    "designed", "developed", "implemented", "built", "created", "managed", "led", "architected",
    "integrated", "collaborated", "enhanced", "optimized", "responsible", "worked", "delivered",
];

const WORK_MODES: &[&str] = &["remote", "onsite", "on-site", "hybrid"];

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}").expect("valid year regex"));

static TITLE_COMPANY_SPLIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+(?:at|@)\s+|\s*\|\s*").expect("valid title split regex")
});

fn plausible_title(value: &str) -> bool {
    let words = word_count(value);
    (1..=6).contains(&words) && value.chars().count() > 2 && !YEAR.is_match(value)
}

fn plausible_company(value: &str) -> bool {
    word_count(value) <= 5
        && value.chars().count() > 2
        && !YEAR.is_match(value)
        && !WORK_MODES.contains(&value.to_lowercase().as_str())
}

/// Title and optional company from the text preceding a date range.
/// Only `Title at Company` and `Title | Company` are split; commas belong
/// to the title.
fn split_heading(before: &str) -> (Option<String>, Option<String>) {
    let before = normalize_whitespace(
        before
            .trim()
            .trim_end_matches(|c: char| matches!(c, '|' | ',' | '-' | '–' | '—' | '@' | '(' | ':'))
            .trim(),
    );
    if before.is_empty() {
        return (None, None);
    }

    let mut parts = TITLE_COMPANY_SPLIT.splitn(&before, 2).map(str::trim);
    let title = parts
        .next()
        .filter(|part| plausible_title(part))
        .map(ToOwned::to_owned);
    let company = parts
        .next()
        .filter(|part| plausible_company(part))
        .map(ToOwned::to_owned);

    match title {
        Some(title) => (Some(title), company),
        None if plausible_title(&before) => (Some(before), None),
        None => (None, None),
    }
}

fn company_from_line(line: &str) -> Option<String> {
    let line = line.trim();
    if starts_with_bullet(line) {
        return None;
    }
    let lowered = line.to_lowercase();
    if ACTION_VERBS.iter().any(|verb| lowered.starts_with(verb)) {
        return None;
    }
    let candidate = line.split(',').next()?.trim();
    plausible_company(candidate).then(|| candidate.to_string())
}

/// One entry per dated line in `text`. `today` resolves open-ended ranges.
pub fn calculate_work_duration(
    text: &str,
    today: NaiveDate,
    recognizer: &dyn EntityRecognizer,
    lookahead: usize,
) -> Vec<JobEntry> {
    let lines: Vec<&str> = text.lines().collect();
    let dated: Vec<(usize, DateRangeMatch)> = lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| find_date_range(line).map(|range| (index, range)))
        .collect();

    let mut jobs = Vec::with_capacity(dated.len());
    for (position, (index, range)) in dated.iter().enumerate() {
        let index = *index;
        let line = lines[index];
        let next_dated = dated
            .get(position + 1)
            .map(|(next, _)| *next)
            .unwrap_or(lines.len());

        let end = match range.end {
            RangeEnd::Date(end) => end,
            RangeEnd::Present => MonthYear::from_date(today),
        };
        let months = range.start.months_until(&end);
        if months < 0 {
            warn!(line = line.trim(), "date range ends before it starts; skipping");
            continue;
        }

        let (mut title, mut company) = split_heading(&line[..range.span.start]);

        let mut company_line = None;
        if company.is_none() {
            let following = (index + 1..next_dated)
                .filter(|candidate| !lines[*candidate].trim().is_empty())
                .take(lookahead);
            for candidate in following {
                if let Some(found) = company_from_line(lines[candidate]) {
                    company = Some(found);
                    company_line = Some(candidate);
                    break;
                }
            }
        }

        if title.is_none() || company.is_none() {
            let context = context_window(&lines, index, &range.span);
            if title.is_none() {
                title = recognizer.first(&context, EntityLabel::Title);
            }
            if company.is_none() {
                company = recognizer.first(&context, EntityLabel::Organization);
            }
        }

        let description = (index + 1..next_dated)
            .filter(|candidate| Some(*candidate) != company_line)
            .map(|candidate| strip_bullet(lines[candidate]).trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let is_current = range.end == RangeEnd::Present;
        let job = JobEntry {
            job_title: title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            company: company.unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
            duration_months: months as f64,
            from: range.start.to_string(),
            to: if is_current {
                PRESENT.to_string()
            } else {
                end.to_string()
            },
            is_current,
            work_description: (!description.is_empty()).then_some(description),
        };
        debug!(
            title = %job.job_title,
            company = %job.company,
            months = job.duration_months,
            "found work experience entry"
        );
        jobs.push(job);
    }

    jobs
}

/// Two lines before through one line after, with the date range itself
/// blanked out.
fn context_window(lines: &[&str], index: usize, span: &Range<usize>) -> String {
    let line = lines[index];
    let mut context: Vec<String> = lines[index.saturating_sub(2)..index]
        .iter()
        .map(|line| line.to_string())
        .collect();
    context.push(format!("{}\n{}", &line[..span.start], &line[span.end..]));
    if let Some(next) = lines.get(index + 1) {
        context.push(next.to_string());
    }
    context.join("\n")
}

/// Entries from the experience section, or from the whole document when
/// no experience heading is found.
pub fn extract_work_experience(
    text: &str,
    today: NaiveDate,
    recognizer: &dyn EntityRecognizer,
    lookahead: usize,
    max_header_words: usize,
) -> Vec<JobEntry> {
    match extract_experience_section(text, max_header_words) {
        Some(section) => calculate_work_duration(&section, today, recognizer, lookahead),
        None => {
            debug!("no experience section found; scanning the whole document");
            calculate_work_duration(text, today, recognizer, lookahead)
        }
    }
}

/// Total years across entries, rounded to two decimals. Overlapping
/// positions are counted once each.
pub fn total_experience(jobs: &[JobEntry]) -> f64 {
    let months: f64 = jobs.iter().map(|job| job.duration_months).sum();
    (months / 12.0 * 100.0).round() / 100.0
}
