//! Barcode Scanner Layer
//!
//! Barcode decoding happens in a collaborator (a camera decoder or a
//! keyboard-wedge hand scanner). Decoded symbols flow through a
//! [`ScanSession`] that suppresses repeat reads and joins each code against
//! the product catalog.

pub mod debounce;
pub mod session;

pub use debounce::ScanDebouncer;
pub use session::{ScanHit, ScanSession};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::BufRead;
use tracing::trace;

/// Barcode symbology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Symbology {
    Ean13,
    Ean8,
    UpcA,
    Code128,
}

impl Symbology {
    /// Best guess from the payload alone, for sources that do not report it
    pub fn infer(payload: &str) -> Self {
        let all_digits = !payload.is_empty() && payload.bytes().all(|b| b.is_ascii_digit());
        match (all_digits, payload.len()) {
            (true, 13) => Symbology::Ean13,
            (true, 12) => Symbology::UpcA,
            (true, 8) => Symbology::Ean8,
            _ => Symbology::Code128,
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Symbology::Ean13 => "EAN13",
            Symbology::Ean8 => "EAN8",
            Symbology::UpcA => "UPCA",
            Symbology::Code128 => "CODE128",
        };
        f.write_str(name)
    }
}

/// Bounding rectangle of a symbol within a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One decoded barcode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeSymbol {
    /// Decoded payload
    pub payload: String,
    pub symbology: Symbology,
    /// Location in the frame, when the source is image based
    pub rect: Option<Rect>,
}

impl BarcodeSymbol {
    /// Symbol with symbology inferred from the payload and no location
    pub fn from_payload(payload: impl Into<String>) -> Self {
        let payload = payload.into();
        Self {
            symbology: Symbology::infer(&payload),
            payload,
            rect: None,
        }
    }
}

/// Source of decoded barcodes
pub trait BarcodeSource {
    /// Symbols decoded from the next frame or input event.
    /// `Ok(None)` means the source is exhausted.
    fn next_symbols(&mut self) -> Result<Option<Vec<BarcodeSymbol>>>;
}

/// Hand scanners in keyboard mode type each code followed by Enter
pub struct LineBarcodeSource<R> {
    reader: R,
    line: String,
}

impl<R: BufRead> LineBarcodeSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
        }
    }
}

impl<R: BufRead> BarcodeSource for LineBarcodeSource<R> {
    fn next_symbols(&mut self) -> Result<Option<Vec<BarcodeSymbol>>> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }

        let payload = self.line.trim();
        trace!("Scanner line {:?}", payload);
        if payload.is_empty() {
            return Ok(Some(Vec::new()));
        }
        Ok(Some(vec![BarcodeSymbol::from_payload(payload)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_infer_symbology() {
        assert_eq!(Symbology::infer("8801234567893"), Symbology::Ean13);
        assert_eq!(Symbology::infer("012345678905"), Symbology::UpcA);
        assert_eq!(Symbology::infer("96385074"), Symbology::Ean8);
        assert_eq!(Symbology::infer("ABC-123"), Symbology::Code128);
        assert_eq!(Symbology::infer(""), Symbology::Code128);
    }

    #[test]
    fn test_symbology_display() {
        assert_eq!(Symbology::Ean13.to_string(), "EAN13");
        assert_eq!(Symbology::UpcA.to_string(), "UPCA");
    }

    #[test]
    fn test_line_source() {
        let input = Cursor::new("8801234567893\r\n\n  ABC-1  \n");
        let mut source = LineBarcodeSource::new(input);

        let first = source.next_symbols().unwrap().unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].payload, "8801234567893");
        assert_eq!(first[0].symbology, Symbology::Ean13);
        assert!(first[0].rect.is_none());

        let blank = source.next_symbols().unwrap().unwrap();
        assert!(blank.is_empty());

        let third = source.next_symbols().unwrap().unwrap();
        assert_eq!(third[0].payload, "ABC-1");

        assert!(source.next_symbols().unwrap().is_none());
    }
}
