//! Vision/OCR Layer
//!
//! Text recognition itself happens in an external OCR engine. This layer
//! ingests its results as [`TextFragment`]s, applies confidence filtering,
//! and prepares label photos so the engine has an easier time.

pub mod ocr;
pub mod preprocess;

pub use ocr::{InlineText, OcrResultFile, TextRecognizer};
pub use preprocess::preprocess_file;

use serde::{Deserialize, Serialize};

/// One piece of recognized text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// Recognized text content
    pub text: String,
    /// Recognition confidence (0.0 - 1.0), when the engine reports one
    pub confidence: Option<f32>,
}

impl TextFragment {
    /// Fragment without a confidence score
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
        }
    }

    /// Fragment with a confidence score
    pub fn with_confidence(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence: Some(confidence),
        }
    }

    /// Whether this fragment passes the confidence threshold.
    /// Unscored fragments always pass.
    pub fn meets_confidence(&self, min_confidence: f32) -> bool {
        self.confidence.map_or(true, |c| c >= min_confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meets_confidence() {
        assert!(TextFragment::with_confidence("a", 0.4).meets_confidence(0.4));
        assert!(!TextFragment::with_confidence("a", 0.39).meets_confidence(0.4));
        assert!(TextFragment::new("a").meets_confidence(0.99));
    }
}
