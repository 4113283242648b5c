//! Product Catalog
//!
//! A flat `code,name,exp` table keyed by barcode payload. Codes stay strings
//! so leading zeros survive.

pub mod sample;

pub use sample::sample_products;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::{classify_freshness, extract::extract_from_text, FreshnessStatus};

const UTF8_BOM: &str = "\u{feff}";
const REQUIRED_COLUMNS: [&str; 3] = ["code", "name", "exp"];

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),
}

/// One row of the product table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Barcode payload
    pub code: String,
    /// Display name
    pub name: String,
    /// Expiration as written in the table
    pub exp: String,
}

impl Product {
    /// Expiration date, if `exp` holds a recognizable date
    pub fn expiration(&self) -> Option<NaiveDate> {
        extract_from_text(&self.exp)
    }

    /// Freshness relative to `today`
    pub fn freshness(&self, today: NaiveDate) -> (FreshnessStatus, Option<i64>) {
        classify_freshness(self.expiration(), today)
    }
}

/// In-memory product table with lookup by code
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
    by_code: HashMap<String, usize>,
}

impl ProductCatalog {
    /// Build a catalog; the first row wins when a code repeats
    pub fn new(products: Vec<Product>) -> Self {
        let mut by_code = HashMap::with_capacity(products.len());
        for (index, product) in products.iter().enumerate() {
            if by_code.contains_key(&product.code) {
                warn!("Duplicate product code {} ignored", product.code);
                continue;
            }
            by_code.insert(product.code.clone(), index);
        }
        Self { products, by_code }
    }

    /// Load a catalog from a UTF-8 CSV file (a leading BOM is allowed)
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_csv(&content)?;
        info!("Loaded {} products from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    /// Parse a catalog from CSV text
    pub fn from_csv(content: &str) -> Result<Self, CatalogError> {
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(CatalogError::MissingColumn(column));
            }
        }

        let mut products = Vec::new();
        for result in reader.deserialize() {
            let product: Product = result?;
            products.push(product);
        }

        Ok(Self::new(products))
    }

    /// Write the catalog as CSV with a UTF-8 BOM so spreadsheet tools
    /// detect the encoding
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let mut file = File::create(path)?;
        file.write_all(UTF8_BOM.as_bytes())?;

        let mut writer = csv::Writer::from_writer(file);
        for product in &self.products {
            writer.serialize(product)?;
        }
        writer.flush()?;

        debug!("Wrote {} products to {:?}", self.len(), path);
        Ok(())
    }

    /// Find a product by barcode payload
    pub fn lookup(&self, code: &str) -> Option<&Product> {
        self.by_code
            .get(code.trim())
            .map(|&index| &self.products[index])
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }
}
