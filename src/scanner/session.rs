//! Scan session: debounce, catalog join, freshness

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info};

use super::{BarcodeSource, BarcodeSymbol, ScanDebouncer, Symbology};
use crate::analysis::FreshnessStatus;
use crate::catalog::ProductCatalog;

/// Name shown for codes missing from the catalog
pub const UNREGISTERED_NAME: &str = "Unregistered product";
/// Expiration shown for codes missing from the catalog
pub const UNREGISTERED_EXP: &str = "N/A";

/// A processed barcode read
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanHit {
    pub code: String,
    pub symbology: Symbology,
    pub registered: bool,
    pub name: String,
    /// Expiration as written in the catalog
    pub exp: String,
    /// Parsed expiration as ISO-8601
    pub expiration: Option<String>,
    pub status: FreshnessStatus,
    pub delta_days: Option<i64>,
}

impl fmt::Display for ScanHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} | {} | exp {}", self.symbology, self.code, self.name, self.exp)?;
        match self.delta_days {
            Some(delta) => write!(f, " | {} ({:+} days)", self.status, delta),
            None => write!(f, " | {}", self.status),
        }
    }
}

/// Joins decoded barcodes against the catalog
pub struct ScanSession {
    catalog: ProductCatalog,
    debouncer: ScanDebouncer,
    today: NaiveDate,
}

impl ScanSession {
    pub fn new(catalog: ProductCatalog, debouncer: ScanDebouncer, today: NaiveDate) -> Self {
        Self {
            catalog,
            debouncer,
            today,
        }
    }

    /// Resolve a single code without debouncing
    pub fn resolve(&self, symbol: &BarcodeSymbol) -> ScanHit {
        match self.catalog.lookup(&symbol.payload) {
            Some(product) => {
                let expiration = product.expiration();
                let (status, delta_days) = product.freshness(self.today);
                ScanHit {
                    code: symbol.payload.clone(),
                    symbology: symbol.symbology,
                    registered: true,
                    name: product.name.clone(),
                    exp: product.exp.clone(),
                    expiration: expiration.map(|d| d.format("%Y-%m-%d").to_string()),
                    status,
                    delta_days,
                }
            }
            None => ScanHit {
                code: symbol.payload.clone(),
                symbology: symbol.symbology,
                registered: false,
                name: UNREGISTERED_NAME.to_string(),
                exp: UNREGISTERED_EXP.to_string(),
                expiration: None,
                status: FreshnessStatus::Unknown,
                delta_days: None,
            },
        }
    }

    /// Process the symbols of one frame read at `now`
    pub fn handle(&mut self, symbols: &[BarcodeSymbol], now: Instant) -> Vec<ScanHit> {
        let mut hits = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            if !self.debouncer.accept(&symbol.payload, now) {
                debug!("Suppressed repeat read of {}", symbol.payload);
                continue;
            }
            hits.push(self.resolve(symbol));
        }
        hits
    }

    /// Drain `source`, reporting each hit to `on_hit`. Returns the number of
    /// hits reported.
    pub fn run<S, F>(&mut self, source: &mut S, mut on_hit: F) -> Result<usize>
    where
        S: BarcodeSource,
        F: FnMut(&ScanHit) -> Result<()>,
    {
        info!(
            "Scan session started ({} products, repeat window {:?})",
            self.catalog.len(),
            self.debouncer.interval()
        );

        let mut count = 0;
        while let Some(symbols) = source.next_symbols()? {
            for hit in self.handle(&symbols, Instant::now()) {
                on_hit(&hit)?;
                count += 1;
            }
        }

        info!("Scan session finished, {} reads processed", count);
        Ok(count)
    }
}
