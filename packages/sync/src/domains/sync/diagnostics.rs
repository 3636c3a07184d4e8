//! Consistency report comparing the sheet with the store.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;

use crate::domains::products::ProductRecord;
use crate::domains::sheets::SheetReader;
use crate::kernel::{CatalogProduct, SyncDeps};

const SAMPLE_SIZE: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsReport {
    pub sheet_products: usize,
    pub duplicate_part_numbers: Vec<String>,
    pub store_products: usize,
    pub sheet_samples: Vec<ProductRecord>,
    pub store_samples: Vec<CatalogProduct>,
}

impl DiagnosticsReport {
    /// Duplicate checks against the store are meaningless when it looks empty.
    pub fn store_looks_empty(&self) -> bool {
        self.store_products == 0
    }
}

/// Part numbers that appear more than once, in first-seen order.
pub fn find_duplicate_part_numbers(records: &[ProductRecord]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for record in records {
        let count = counts.entry(record.part_no()).or_insert(0);
        if *count == 0 {
            order.push(record.part_no());
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter(|part| counts[part] > 1)
        .map(str::to_string)
        .collect()
}

pub async fn run_diagnostics(deps: &SyncDeps) -> Result<DiagnosticsReport> {
    let reader = SheetReader::new(deps.sheets.clone());
    let sheet_products = reader.get_all_products().await?;
    let store_products = deps.catalog.list_products().await?;

    Ok(DiagnosticsReport {
        sheet_products: sheet_products.len(),
        duplicate_part_numbers: find_duplicate_part_numbers(&sheet_products),
        store_products: store_products.len(),
        sheet_samples: sheet_products.into_iter().take(SAMPLE_SIZE).collect(),
        store_samples: store_products.into_iter().take(SAMPLE_SIZE).collect(),
    })
}
