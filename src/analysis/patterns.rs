//! Ordered table of printed date shapes
//!
//! Each entry pairs a matcher with the chrono formats it may be read with. Table
//! order is precedence: the first pattern that matches wins, and within a
//! pattern the first format that yields a real calendar date wins.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Four-digit year, 19xx or 20xx only
const YEAR: &str = r"(?:19|20)[0-9]{2}";
/// One- or two-digit month, 1..=12
const MONTH: &str = r"(?:0?[1-9]|1[0-2])";
/// One- or two-digit day, 1..=31
const DAY: &str = r"(?:0?[1-9]|[12][0-9]|3[01])";
/// Numeric field separator
const SEP: &str = r"[-/.]";

/// Localized year marker
pub const YEAR_MARKER: char = '년';
/// Localized month marker
pub const MONTH_MARKER: char = '월';
/// Localized day marker (optional in printed dates)
pub const DAY_MARKER: char = '일';

/// chrono formats for a year-month-day field order
const YEAR_MONTH_DAY: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];
/// chrono formats for a month-day-year field order
const MONTH_DAY_YEAR: &[&str] = &["%m-%d-%Y", "%m/%d/%Y", "%m.%d.%Y"];
/// chrono formats for a day-month-year field order
const DAY_MONTH_YEAR: &[&str] = &["%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y"];

/// A date-shaped matcher plus its candidate chrono formats
#[derive(Debug)]
pub struct DatePattern {
    /// Short identifier used in logs
    pub name: &'static str,
    /// Matcher; the date text is captured in the `date` group
    regex: Regex,
    /// Candidate format groups, tried in order
    formats: &'static [&'static [&'static str]],
}

impl DatePattern {
    fn new(name: &'static str, body: &str, formats: &'static [&'static [&'static str]]) -> Self {
        // A match may not begin or end inside a run of digits
        let source = format!(r"(?:^|[^0-9])(?P<date>{body})(?:[^0-9]|$)");
        let regex = Regex::new(&source).expect("static date pattern");
        Self { name, regex, formats }
    }

    /// First date-shaped substring of `text`, if any
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.name("date"))
            .map(|m| m.as_str())
    }

    /// Parse matched date text with the first candidate format that yields a
    /// real calendar date. Each format uses a single separator throughout.
    pub fn parse(&self, cleaned: &str) -> Option<NaiveDate> {
        self.formats
            .iter()
            .flat_map(|group| group.iter())
            .find_map(|fmt| NaiveDate::parse_from_str(cleaned, fmt).ok())
    }
}

/// The fixed pattern table, in precedence order
pub static DATE_PATTERNS: Lazy<Vec<DatePattern>> = Lazy::new(|| {
    vec![
        DatePattern::new(
            "iso",
            &format!("{YEAR}{SEP}{MONTH}{SEP}{DAY}"),
            &[YEAR_MONTH_DAY],
        ),
        DatePattern::new(
            "us",
            &format!("{MONTH}{SEP}{DAY}{SEP}{YEAR}"),
            &[MONTH_DAY_YEAR, DAY_MONTH_YEAR],
        ),
        DatePattern::new(
            "european",
            &format!("{DAY}{SEP}{MONTH}{SEP}{YEAR}"),
            &[DAY_MONTH_YEAR, MONTH_DAY_YEAR],
        ),
        DatePattern::new(
            "localized",
            &format!(
                r"{YEAR}\s*{YEAR_MARKER}\s*{MONTH}\s*{MONTH_MARKER}\s*{DAY}(?:\s*{DAY_MARKER})?"
            ),
            &[YEAR_MONTH_DAY],
        ),
    ]
});
