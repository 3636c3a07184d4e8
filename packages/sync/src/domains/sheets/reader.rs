//! Reads product rows from the catalog worksheet.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domains::products::{
    is_blank_row, normalize_fields, ProductRecord, FIRST_DATA_ROW, PART_NO,
};
use crate::kernel::{BaseSheetSource, RawRecord, SheetMetadata};

/// Columns a row must fill to count as a product.
const REQUIRED_FIELDS: &[&str] = &[PART_NO];

#[derive(Clone)]
pub struct SheetReader {
    source: Arc<dyn BaseSheetSource>,
}

impl SheetReader {
    pub fn new(source: Arc<dyn BaseSheetSource>) -> Self {
        Self { source }
    }

    /// Every valid product row, normalized.
    ///
    /// Blank rows are skipped silently; rows missing a required field are
    /// skipped with a warning naming the sheet row.
    pub async fn get_all_products(&self) -> Result<Vec<ProductRecord>> {
        let rows = self.source.rows().await?;

        if rows.records.is_empty() {
            warn!(worksheet = %rows.worksheet, "No products found in the sheet");
            return Ok(Vec::new());
        }

        let products = normalize_rows(&rows.worksheet, &rows.records);
        info!(
            worksheet = %rows.worksheet,
            count = products.len(),
            "Read valid products from the sheet"
        );
        Ok(products)
    }

    pub async fn get_product_by_part_no(&self, part_no: &str) -> Result<Option<ProductRecord>> {
        let products = self.get_all_products().await?;
        Ok(products.into_iter().find(|p| p.part_no() == part_no))
    }

    pub async fn get_sheet_metadata(&self) -> Result<SheetMetadata> {
        self.source.metadata().await
    }

    /// True when the sheet answers a metadata request.
    pub async fn connection_status(&self) -> bool {
        match self.source.metadata().await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Lost connection to Google Sheets");
                false
            }
        }
    }

    pub async fn refresh_connection(&self) -> Result<()> {
        self.source.refresh().await
    }
}

/// Turn raw worksheet rows into validated product records.
pub fn normalize_rows(worksheet: &str, records: &[RawRecord]) -> Vec<ProductRecord> {
    records
        .iter()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let row_number = idx + FIRST_DATA_ROW;

            if is_blank_row(raw.values()) {
                return None;
            }

            let fields = normalize_fields(raw);
            let record = ProductRecord::new(row_number, worksheet, fields);

            if let Some(missing) = REQUIRED_FIELDS
                .iter()
                .find(|field| record.get(field).map_or(true, str::is_empty))
            {
                warn!(row = row_number, field = %missing, "Row is missing a required field");
                return None;
            }

            Some(record)
        })
        .collect()
}
