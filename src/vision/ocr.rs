//! OCR result ingestion
//!
//! The OCR engine runs outside this program. Its output reaches us either as
//! a JSON file or as literal text on the command line.

use anyhow::Result;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::TextFragment;

#[derive(Error, Debug)]
pub enum OcrInputError {
    #[error("Failed to read OCR results: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse OCR results: {0}")]
    Json(#[from] serde_json::Error),

    #[error("OCR results must be a JSON array, found {0}")]
    NotAnArray(&'static str),
}

/// Source of recognized text for one label
pub trait TextRecognizer {
    /// Produce every raw result the engine reported, unfiltered
    fn recognize(&mut self) -> Result<OcrOutput>;
}

/// Raw recognition output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcrOutput {
    /// Results that carried usable text, in engine order
    pub results: Vec<TextFragment>,
    /// Results that carried no usable text
    pub malformed: usize,
}

impl OcrOutput {
    /// Total number of results the engine reported
    pub fn raw_count(&self) -> usize {
        self.results.len() + self.malformed
    }

    /// Results at or above `min_confidence`, order preserved
    pub fn filtered(&self, min_confidence: f32) -> Vec<TextFragment> {
        let kept: Vec<TextFragment> = self
            .results
            .iter()
            .filter(|f| f.meets_confidence(min_confidence))
            .cloned()
            .collect();

        debug!(
            "Confidence filter {:.2}: kept {} of {} results",
            min_confidence,
            kept.len(),
            self.raw_count()
        );
        kept
    }
}

/// OCR results saved as JSON by an external engine.
///
/// Accepts an array whose entries are any of:
/// - `{"text": "EXP 2025-09-15", "confidence": 0.91}`
/// - `[[[x, y], ...], "EXP 2025-09-15", 0.91]` (bbox, text, confidence)
/// - `"EXP 2025-09-15"`
pub struct OcrResultFile {
    path: PathBuf,
}

impl OcrResultFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TextRecognizer for OcrResultFile {
    fn recognize(&mut self) -> Result<OcrOutput> {
        let content = std::fs::read_to_string(&self.path).map_err(OcrInputError::from)?;
        let output = parse_ocr_json(&content)?;
        info!(
            "Loaded {} OCR results from {:?}",
            output.raw_count(),
            self.path
        );
        Ok(output)
    }
}

/// Text supplied directly, e.g. typed on the command line
pub struct InlineText {
    texts: Vec<String>,
}

impl InlineText {
    pub fn new(texts: Vec<String>) -> Self {
        Self { texts }
    }
}

impl TextRecognizer for InlineText {
    fn recognize(&mut self) -> Result<OcrOutput> {
        Ok(OcrOutput {
            results: self.texts.iter().map(TextFragment::new).collect(),
            malformed: 0,
        })
    }
}

/// Parse a JSON array of OCR results
pub fn parse_ocr_json(content: &str) -> Result<OcrOutput, OcrInputError> {
    let value: Value = serde_json::from_str(content)?;
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(_) => return Err(OcrInputError::NotAnArray("object")),
        Value::String(_) => return Err(OcrInputError::NotAnArray("string")),
        Value::Number(_) => return Err(OcrInputError::NotAnArray("number")),
        Value::Bool(_) => return Err(OcrInputError::NotAnArray("boolean")),
        Value::Null => return Err(OcrInputError::NotAnArray("null")),
    };

    let mut output = OcrOutput::default();
    for (index, entry) in entries.iter().enumerate() {
        match parse_entry(entry) {
            Some(fragment) => output.results.push(fragment),
            None => {
                warn!("Ignoring OCR result {} without text: {}", index, entry);
                output.malformed += 1;
            }
        }
    }

    Ok(output)
}

fn parse_entry(entry: &Value) -> Option<TextFragment> {
    let (text, confidence) = match entry {
        Value::String(text) => (text.as_str(), None),
        Value::Object(map) => (
            map.get("text")?.as_str()?,
            map.get("confidence").and_then(Value::as_f64),
        ),
        Value::Array(items) => (
            items.get(1)?.as_str()?,
            items.get(2).and_then(Value::as_f64),
        ),
        _ => return None,
    };

    Some(match confidence {
        Some(c) => TextFragment::with_confidence(text, c as f32),
        None => TextFragment::new(text),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_object_entries() {
        let output = parse_ocr_json(
            r#"[{"text": "EXP 2025-09-15", "confidence": 0.91}, {"text": "LOT99"}]"#,
        )
        .unwrap();

        assert_eq!(output.raw_count(), 2);
        assert_eq!(output.results[0].text, "EXP 2025-09-15");
        assert!((output.results[0].confidence.unwrap() - 0.91).abs() < 1e-6);
        assert_eq!(output.results[1].confidence, None);
    }

    #[test]
    fn test_parse_bbox_tuples() {
        let output = parse_ocr_json(
            r#"[[[[0, 0], [10, 0], [10, 5], [0, 5]], "2025.09.15", 0.35]]"#,
        )
        .unwrap();

        assert_eq!(output.results.len(), 1);
        assert_eq!(output.results[0].text, "2025.09.15");
        assert!((output.results[0].confidence.unwrap() - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_parse_plain_strings() {
        let output = parse_ocr_json(r#"["BATCH 22A", "EXP 2025-09-15"]"#).unwrap();
        assert_eq!(output.results.len(), 2);
        assert_eq!(output.malformed, 0);
    }

    #[test]
    fn test_non_text_entries_counted_but_skipped() {
        let output = parse_ocr_json(
            r#"[{"text": 42, "confidence": 0.9}, null, [[], null, 0.5], "2025-01-01"]"#,
        )
        .unwrap();

        assert_eq!(output.results.len(), 1);
        assert_eq!(output.malformed, 3);
        assert_eq!(output.raw_count(), 4);
    }

    #[test]
    fn test_top_level_must_be_array() {
        let result = parse_ocr_json(r#"{"text": "2025-01-01"}"#);
        assert!(matches!(result, Err(OcrInputError::NotAnArray("object"))));

        let result = parse_ocr_json("not json");
        assert!(matches!(result, Err(OcrInputError::Json(_))));
    }

    #[test]
    fn test_filtered_keeps_order_and_raw_count() {
        let output = OcrOutput {
            results: vec![
                TextFragment::with_confidence("low", 0.1),
                TextFragment::with_confidence("high", 0.8),
                TextFragment::new("unscored"),
            ],
            malformed: 1,
        };

        let kept = output.filtered(0.4);
        let texts: Vec<_> = kept.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["high", "unscored"]);
        assert_eq!(output.raw_count(), 4);
    }

    #[test]
    fn test_result_file_recognizer() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, r#"[{{"text": "EXP 2025-09-15", "confidence": 0.7}}]"#).unwrap();

        let mut recognizer = OcrResultFile::new(temp_file.path());
        let output = recognizer.recognize().unwrap();
        assert_eq!(output.results[0].text, "EXP 2025-09-15");
    }

    #[test]
    fn test_result_file_missing() {
        let mut recognizer = OcrResultFile::new("/nonexistent/ocr.json");
        assert!(recognizer.recognize().is_err());
    }

    #[test]
    fn test_inline_text_recognizer() {
        let mut recognizer = InlineText::new(vec!["a".into(), "b".into()]);
        let output = recognizer.recognize().unwrap();
        assert_eq!(output.raw_count(), 2);
        assert!(output.results.iter().all(|f| f.confidence.is_none()));
    }
}
