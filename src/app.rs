//! Application Coordinator
//!
//! Owns the configuration and the reference day for one invocation and
//! wires collaborators (OCR results, barcode input, catalog) into the
//! analysis core.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::analysis::{analyze, ScanReport};
use crate::catalog::{sample_products, Product, ProductCatalog};
use crate::config::AppConfig;
use crate::scanner::{BarcodeSymbol, LineBarcodeSource, ScanDebouncer, ScanHit, ScanSession};
use crate::storage;
use crate::vision::{preprocess_file, InlineText, OcrResultFile, TextRecognizer};

/// Main application coordinator
pub struct ExpiryScanApp {
    config: AppConfig,
    /// Reference day for every freshness judgment in this run
    today: NaiveDate,
}

impl ExpiryScanApp {
    pub fn new(config: AppConfig, today: NaiveDate) -> Self {
        Self { config, today }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Analyze label text, either from an OCR result file or given inline
    pub fn extract(
        &self,
        texts: Vec<String>,
        ocr_json: Option<&Path>,
        min_confidence: Option<f32>,
    ) -> Result<ScanReport> {
        let mut recognizer: Box<dyn TextRecognizer> = match ocr_json {
            Some(path) => {
                if !texts.is_empty() {
                    warn!("Ignoring inline text because --ocr-json was given");
                }
                Box::new(OcrResultFile::new(path))
            }
            None if texts.is_empty() => bail!("No label text given; pass TEXT arguments or --ocr-json"),
            None => Box::new(InlineText::new(texts)),
        };

        let output = recognizer.recognize()?;
        let min_confidence = min_confidence.unwrap_or(self.config.ocr.min_confidence);
        let fragments = output.filtered(min_confidence);

        Ok(analyze(&fragments, output.raw_count(), self.today))
    }

    /// Look up one code in the catalog
    pub fn lookup(&self, code: &str, catalog_path: Option<&Path>) -> Result<ScanHit> {
        let session = ScanSession::new(
            self.load_catalog(catalog_path)?,
            ScanDebouncer::new(Duration::ZERO),
            self.today,
        );
        Ok(session.resolve(&BarcodeSymbol::from_payload(code.trim())))
    }

    /// Process codes from a line-oriented scanner until input ends
    pub fn scan<R, F>(&self, input: R, catalog_path: Option<&Path>, on_hit: F) -> Result<usize>
    where
        R: BufRead,
        F: FnMut(&ScanHit) -> Result<()>,
    {
        let interval = Duration::from_millis(self.config.catalog.read_interval_ms);
        let mut session = ScanSession::new(
            self.load_catalog(catalog_path)?,
            ScanDebouncer::new(interval),
            self.today,
        );
        let mut source = LineBarcodeSource::new(input);
        session.run(&mut source, on_hit)
    }

    /// Write the sample catalog, refusing to overwrite unless `force`
    pub fn init_catalog(&self, output: Option<&Path>, force: bool) -> Result<PathBuf> {
        let path = self.catalog_path(output)?;
        if path.exists() && !force {
            bail!("{:?} already exists; pass --force to overwrite", path);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let catalog = ProductCatalog::new(sample_products(self.today));
        catalog
            .save(&path)
            .with_context(|| format!("Failed to write catalog {:?}", path))?;

        info!("Wrote {} sample products to {:?}", catalog.len(), path);
        if let Some(soonest) = catalog.products().iter().filter_map(Product::expiration).min() {
            debug!("Earliest sample expiration {}", soonest);
        }
        Ok(path)
    }

    /// Clean up a label photo for the external OCR engine
    pub fn preprocess(&self, input: &Path, output: &Path) -> Result<()> {
        preprocess_file(input, output, &self.config.preprocess)?;
        Ok(())
    }

    fn catalog_path(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit.or(self.config.catalog.path.as_deref()) {
            Some(path) => Ok(path.to_path_buf()),
            None => storage::default_catalog_path(),
        }
    }

    fn load_catalog(&self, explicit: Option<&Path>) -> Result<ProductCatalog> {
        let path = self.catalog_path(explicit)?;
        if !path.exists() {
            bail!(
                "Product catalog {:?} not found; run `expiry-scan init-catalog` to create a sample",
                path
            );
        }
        ProductCatalog::load(&path).with_context(|| format!("Failed to load catalog {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FreshnessStatus;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 10).unwrap()
    }

    fn app() -> ExpiryScanApp {
        ExpiryScanApp::new(AppConfig::default(), today())
    }

    #[test]
    fn test_extract_inline_text() {
        let report = app()
            .extract(
                vec!["BATCH 22A".into(), "EXP 2025-09-15".into(), "LOT99".into()],
                None,
                None,
            )
            .unwrap();

        assert_eq!(report.date_found.as_deref(), Some("2025-09-15"));
        assert_eq!(report.status, FreshnessStatus::Imminent);
        assert_eq!(report.raw_results_count, 3);
    }

    #[test]
    fn test_extract_requires_input() {
        assert!(app().extract(Vec::new(), None, None).is_err());
    }

    #[test]
    fn test_extract_ocr_json_applies_threshold() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ocr.json");
        std::fs::write(
            &path,
            r#"[{"text": "2025-09-12", "confidence": 0.2}, {"text": "EXP 2026-01-01", "confidence": 0.9}]"#,
        )
        .unwrap();

        let report = app().extract(Vec::new(), Some(path.as_path()), None).unwrap();
        assert_eq!(report.texts, vec!["EXP 2026-01-01"]);
        assert_eq!(report.date_found.as_deref(), Some("2026-01-01"));
        assert_eq!(report.status, FreshnessStatus::Normal);
        assert_eq!(report.raw_results_count, 2);

        let report = app().extract(Vec::new(), Some(path.as_path()), Some(0.1)).unwrap();
        assert_eq!(report.date_found.as_deref(), Some("2025-09-12"));
        assert_eq!(report.status, FreshnessStatus::Imminent);
    }

    #[test]
    fn test_init_catalog_then_lookup_and_scan() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog").join("product_db.csv");
        let app = app();

        let written = app.init_catalog(Some(path.as_path()), false).unwrap();
        assert_eq!(written, path);
        assert!(app.init_catalog(Some(path.as_path()), false).is_err());
        assert!(app.init_catalog(Some(path.as_path()), true).is_ok());

        let code = ProductCatalog::load(&path).unwrap().products()[0].code.clone();
        let hit = app.lookup(&code, Some(path.as_path())).unwrap();
        assert!(hit.registered);
        assert_eq!(hit.status, FreshnessStatus::Normal);

        let input = Cursor::new(format!("{code}\n{code}\n0000000000000\n"));
        let mut hits = Vec::new();
        let count = app
            .scan(input, Some(path.as_path()), |hit| {
                hits.push(hit.clone());
                Ok(())
            })
            .unwrap();
        assert_eq!(count, 2);
        assert!(hits[0].registered);
        assert!(!hits[1].registered);
    }

    #[test]
    fn test_lookup_missing_catalog() {
        let dir = tempdir().unwrap();
        let result = app().lookup("123", Some(dir.path().join("missing.csv").as_path()));
        assert!(result.is_err());
    }
}
