//! Publish sheet products to the store and record them in the database.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

use crate::domains::products::{Product, ProductData, ProductRecord};
use crate::kernel::{CatalogProduct, SyncDeps};

/// What a sync run will do with one sheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Not in the store yet; publish then persist.
    Create(ProductData),
    /// Already in the store under `shopify_id`; persist only.
    Existing { product: ProductData, shopify_id: i64 },
    /// Part number already seen earlier in this batch.
    Duplicate { part_no: String, row_number: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub created: usize,
    pub skipped_existing: usize,
    pub skipped_duplicate: usize,
    pub failed: usize,
    pub persisted: usize,
    pub persist_failed: usize,
}

/// Map store SKUs to product ids.
pub fn sku_index(products: &[CatalogProduct]) -> HashMap<String, i64> {
    products
        .iter()
        .filter_map(|p| p.sku.as_ref().map(|sku| (sku.clone(), p.id)))
        .collect()
}

/// Decide per row, without side effects.
pub fn plan_sync(records: &[ProductRecord], existing: &HashMap<String, i64>) -> Vec<SyncAction> {
    let mut seen: HashSet<&str> = HashSet::new();

    records
        .iter()
        .map(|record| {
            let part_no = record.part_no();
            if !seen.insert(part_no) {
                return SyncAction::Duplicate {
                    part_no: part_no.to_string(),
                    row_number: record.row_number,
                };
            }

            let product = ProductData::from_record(record);
            match existing.get(part_no) {
                Some(&shopify_id) => SyncAction::Existing { product, shopify_id },
                None => SyncAction::Create(product),
            }
        })
        .collect()
}

/// Publish missing products and upsert every product into the database.
///
/// Per-product failures are counted and logged; only failing to list the
/// store aborts the run.
pub async fn sync_products(deps: &SyncDeps, records: &[ProductRecord]) -> Result<SyncReport> {
    let existing = deps
        .catalog
        .list_products()
        .await
        .context("Failed to list store products")?;
    info!(count = existing.len(), "Loaded store products");

    let actions = plan_sync(records, &sku_index(&existing));
    let mut report = SyncReport::default();

    for action in actions {
        let (product, shopify_id) = match action {
            SyncAction::Duplicate { part_no, row_number } => {
                warn!(part_no = %part_no, row = row_number, "Duplicate part number in sheet, skipping");
                report.skipped_duplicate += 1;
                continue;
            }
            SyncAction::Existing { product, shopify_id } => {
                report.skipped_existing += 1;
                (product, Some(shopify_id))
            }
            SyncAction::Create(product) => {
                let payload = product.to_new_product(&deps.shopify_vendor);
                match deps.catalog.create_product(&payload).await {
                    Ok(created) => {
                        info!(part_no = %product.part, shopify_id = created.id, "Product created");
                        report.created += 1;
                        (product, Some(created.id))
                    }
                    Err(e) => {
                        warn!(part_no = %product.part, error = %e, "Failed to create product");
                        report.failed += 1;
                        (product, None)
                    }
                }
            }
        };

        match Product::upsert(&product, shopify_id, &deps.db_pool).await {
            Ok(_) => report.persisted += 1,
            Err(e) => {
                warn!(part_no = %product.part, error = %e, "Failed to save product to database");
                report.persist_failed += 1;
            }
        }
    }

    info!(
        created = report.created,
        existing = report.skipped_existing,
        duplicates = report.skipped_duplicate,
        failed = report.failed,
        persisted = report.persisted,
        "Sync complete"
    );
    Ok(report)
}
