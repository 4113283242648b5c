//! Application Configuration
//!
//! User settings and preferences stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// OCR result handling
    pub ocr: OcrSettings,
    /// Label photo preprocessing
    pub preprocess: PreprocessSettings,
    /// Product catalog
    pub catalog: CatalogSettings,
    /// Output formatting
    pub output: OutputSettings,
}

/// OCR result handling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Results below this confidence are ignored (0.0 - 1.0)
    pub min_confidence: f32,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self { min_confidence: 0.4 }
    }
}

/// Label photo preprocessing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessSettings {
    /// Run the pipeline at all
    pub enabled: bool,
    /// Histogram equalization for contrast
    pub equalize: bool,
    /// Gaussian blur sigma; 0 disables blurring
    pub blur_sigma: f32,
    /// Morphological opening radius; 0 disables opening
    pub open_radius: u8,
}

impl Default for PreprocessSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            equalize: true,
            blur_sigma: 1.0,
            open_radius: 1,
        }
    }
}

/// Product catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Catalog CSV path; defaults to `product_db.csv` in the data directory
    pub path: Option<PathBuf>,
    /// Repeat reads of the same code within this window are ignored
    pub read_interval_ms: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: None,
            read_interval_ms: 2000,
        }
    }
}

/// Output formatting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Emit JSON instead of text
    pub json: bool,
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
