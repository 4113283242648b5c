//! Date extraction from recognized text fragments

use chrono::NaiveDate;
use tracing::{debug, trace};

use super::patterns::{DatePattern, DATE_PATTERNS, DAY_MARKER, MONTH_MARKER, YEAR_MARKER};
use crate::vision::TextFragment;

/// Find the first printed calendar date in `fragments`.
///
/// Fragments are scanned in order, patterns in table order, formats in
/// pattern order; the first combination that produces a real calendar date
/// wins. Only the first match of a pattern inside a fragment is considered.
/// Returns `None` when nothing matches or every candidate is an impossible
/// date.
pub fn extract_date(fragments: &[TextFragment]) -> Option<NaiveDate> {
    fragments.iter().find_map(|fragment| extract_from_text(&fragment.text))
}

/// Try every pattern against a single piece of text
pub fn extract_from_text(text: &str) -> Option<NaiveDate> {
    DATE_PATTERNS
        .iter()
        .find_map(|pattern| extract_with_pattern(pattern, text))
}

fn extract_with_pattern(pattern: &DatePattern, text: &str) -> Option<NaiveDate> {
    let raw = pattern.find(text)?;
    trace!("Pattern '{}' matched {:?}", pattern.name, raw);

    let cleaned = strip_markers(raw);
    let date = pattern.parse(&cleaned);
    match date {
        Some(date) => debug!("Extracted {} from {:?} via '{}'", date, raw, pattern.name),
        None => debug!("Discarded {:?}: not a calendar date", raw),
    }
    date
}

/// Turn localized year/month markers into separators and drop the rest
fn strip_markers(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| match c {
            YEAR_MARKER | MONTH_MARKER => Some('-'),
            DAY_MARKER => None,
            c if c.is_whitespace() => None,
            c => Some(c),
        })
        .collect()
}
