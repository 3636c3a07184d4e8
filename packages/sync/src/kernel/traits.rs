// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Row validation, sync decisions and price extraction live in domains/.
//
// Naming convention: Base* for trait names (e.g., BaseSheetSource)

use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Serialize;
use shopify_client::NewProduct;

// =============================================================================
// Sheet Source Trait (Infrastructure - spreadsheet reads)
// =============================================================================

/// A sheet row keyed by raw header text, in column order.
pub type RawRecord = IndexMap<String, String>;

/// Descriptive data about the worksheet being synced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SheetMetadata {
    pub title: String,
    pub worksheet_title: String,
    pub url: Option<String>,
    pub row_count: i64,
    pub col_count: i64,
    pub headers: Vec<String>,
}

impl SheetMetadata {
    pub fn header_count(&self) -> usize {
        self.headers.len()
    }
}

/// Raw rows of the active worksheet.
#[derive(Debug, Clone, Default)]
pub struct SheetRows {
    pub worksheet: String,
    pub records: Vec<RawRecord>,
}

#[async_trait]
pub trait BaseSheetSource: Send + Sync {
    /// Spreadsheet and worksheet metadata including the header row
    async fn metadata(&self) -> Result<SheetMetadata>;

    /// Every data row below the header row, blank rows included
    async fn rows(&self) -> Result<SheetRows>;

    /// Drop cached credentials and reconnect on the next call
    async fn refresh(&self) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// Product Catalog Trait (Infrastructure - storefront)
// =============================================================================

/// The storefront's view of a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogProduct {
    pub id: i64,
    pub title: String,
    pub sku: Option<String>,
}

#[async_trait]
pub trait BaseProductCatalog: Send + Sync {
    /// Every product currently in the store
    async fn list_products(&self) -> Result<Vec<CatalogProduct>>;

    /// Publish a new product, returning the stored product
    async fn create_product(&self, product: &NewProduct) -> Result<CatalogProduct>;
}

// =============================================================================
// Page Fetcher Trait (Infrastructure - vendor HTML)
// =============================================================================

#[async_trait]
pub trait BasePageFetcher: Send + Sync {
    /// Fetch a page and return its HTML body
    async fn fetch_html(&self, url: &str) -> Result<String>;
}
