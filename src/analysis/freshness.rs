//! Freshness classification relative to a reference day

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days before expiry (inclusive) during which a product counts as imminent
pub const IMMINENT_WINDOW_DAYS: i64 = 7;

/// Categorical judgment of how close or past an expiration date is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FreshnessStatus {
    /// Expiration date is before the reference day
    Expired,
    /// Expires within the imminent window
    Imminent,
    /// Comfortably before expiry
    Normal,
    /// No date was found
    Unknown,
}

impl FreshnessStatus {
    /// Stable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            FreshnessStatus::Expired => "EXPIRED",
            FreshnessStatus::Imminent => "IMMINENT",
            FreshnessStatus::Normal => "NORMAL",
            FreshnessStatus::Unknown => "UNKNOWN",
        }
    }

    /// Human-readable description for terminal output
    pub fn description(&self) -> &'static str {
        match self {
            FreshnessStatus::Expired => "expired",
            FreshnessStatus::Imminent => "expiring soon, check now",
            FreshnessStatus::Normal => "fresh",
            FreshnessStatus::Unknown => "no date information",
        }
    }
}

impl fmt::Display for FreshnessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify `extracted` against `today`.
///
/// Returns the status and the signed day difference `extracted - today`.
/// `today` is always supplied by the caller; this never reads the clock.
pub fn classify_freshness(
    extracted: Option<NaiveDate>,
    today: NaiveDate,
) -> (FreshnessStatus, Option<i64>) {
    let Some(extracted) = extracted else {
        return (FreshnessStatus::Unknown, None);
    };

    let delta_days = extracted.signed_duration_since(today).num_days();
    let status = if delta_days < 0 {
        FreshnessStatus::Expired
    } else if delta_days <= IMMINENT_WINDOW_DAYS {
        FreshnessStatus::Imminent
    } else {
        FreshnessStatus::Normal
    };

    (status, Some(delta_days))
}
