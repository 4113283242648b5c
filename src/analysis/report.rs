//! Structured scan report

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::freshness::FreshnessStatus;
use crate::vision::TextFragment;

/// Result of analyzing one label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Recognized texts that were considered, in order
    pub texts: Vec<String>,
    /// Extracted date as ISO-8601 (`YYYY-MM-DD`)
    pub date_found: Option<String>,
    /// Signed days from the reference day to the extracted date
    pub delta_days: Option<i64>,
    /// Freshness label
    pub status: FreshnessStatus,
    /// Number of raw OCR results, including ones dropped by confidence filtering
    pub raw_results_count: usize,
    /// Mean confidence of the considered texts that carried a score
    pub average_confidence: Option<f32>,
    pub summary: ReportSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub text_count: usize,
    pub date_present: bool,
}

/// Assemble the report for one analysis
pub fn format_result(
    fragments: &[TextFragment],
    extracted: Option<NaiveDate>,
    status: FreshnessStatus,
    delta_days: Option<i64>,
    raw_result_count: usize,
) -> ScanReport {
    let texts: Vec<String> = fragments.iter().map(|f| f.text.clone()).collect();

    let scores: Vec<f32> = fragments.iter().filter_map(|f| f.confidence).collect();
    let average_confidence = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f32>() / scores.len() as f32)
    };

    ScanReport {
        summary: ReportSummary {
            text_count: texts.len(),
            date_present: extracted.is_some(),
        },
        texts,
        date_found: extracted.map(|d| d.format("%Y-%m-%d").to_string()),
        delta_days,
        status,
        raw_results_count: raw_result_count,
        average_confidence,
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Texts ({}):", self.summary.text_count)?;
        for text in &self.texts {
            writeln!(f, "  {}", text)?;
        }
        match (&self.date_found, self.delta_days) {
            (Some(date), Some(delta)) => writeln!(f, "Date found: {} ({:+} days)", date, delta)?,
            _ => writeln!(f, "Date found: none")?,
        }
        writeln!(f, "Status: {} - {}", self.status, self.status.description())?;
        if let Some(avg) = self.average_confidence {
            writeln!(f, "Average confidence: {:.2}", avg)?;
        }
        write!(f, "Raw OCR results: {}", self.raw_results_count)
    }
}
