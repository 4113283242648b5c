//! Expiration Date Analysis
//!
//! Finds a printed date in recognized label text and judges how fresh the
//! product is relative to a reference day. Everything here is pure: no I/O,
//! no clock reads, identical output for identical input.

pub mod extract;
pub mod freshness;
pub mod patterns;
pub mod report;

pub use extract::extract_date;
pub use freshness::{classify_freshness, FreshnessStatus};
pub use report::{format_result, ScanReport};

use chrono::NaiveDate;
use tracing::debug;

use crate::vision::TextFragment;

/// Run extraction, classification and report assembly in one pass
pub fn analyze(fragments: &[TextFragment], raw_result_count: usize, today: NaiveDate) -> ScanReport {
    let extracted = extract_date(fragments);
    let (status, delta_days) = classify_freshness(extracted, today);

    debug!(
        "Analyzed {} fragments: date={:?}, status={}, delta={:?}",
        fragments.len(),
        extracted,
        status,
        delta_days
    );

    format_result(fragments, extracted, status, delta_days, raw_result_count)
}
