// Mock implementations for testing
//
// In-memory stand-ins for the infrastructure traits. Each mock records the
// calls it receives so tests can assert on them.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shopify_client::NewProduct;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{
    BasePageFetcher, BaseProductCatalog, BaseSheetSource, CatalogProduct, RawRecord,
    SheetMetadata, SheetRows,
};

/// Build a raw sheet row from `(header, value)` pairs.
pub fn raw_record(pairs: &[(&str, &str)]) -> RawRecord {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// =============================================================================
// Mock Sheet Source
// =============================================================================

/// Serves queued snapshots in order, then keeps repeating the last one.
pub struct MockSheetSource {
    metadata: SheetMetadata,
    snapshots: Mutex<VecDeque<std::result::Result<SheetRows, String>>>,
    last: Mutex<Option<SheetRows>>,
    reads: AtomicUsize,
    refreshes: AtomicUsize,
}

impl MockSheetSource {
    pub fn new(worksheet: &str) -> Self {
        Self {
            metadata: SheetMetadata {
                title: "Test Catalog".to_string(),
                worksheet_title: worksheet.to_string(),
                url: Some("https://docs.google.com/spreadsheets/d/test".to_string()),
                row_count: 1000,
                col_count: 26,
                headers: Vec::new(),
            },
            snapshots: Mutex::new(VecDeque::new()),
            last: Mutex::new(None),
            reads: AtomicUsize::new(0),
            refreshes: AtomicUsize::new(0),
        }
    }

    pub fn with_headers(mut self, headers: &[&str]) -> Self {
        self.metadata.headers = headers.iter().map(|h| h.to_string()).collect();
        self
    }

    /// Queue a snapshot of worksheet rows.
    pub fn with_rows(self, records: Vec<RawRecord>) -> Self {
        let rows = SheetRows {
            worksheet: self.metadata.worksheet_title.clone(),
            records,
        };
        self.snapshots.lock().unwrap().push_back(Ok(rows));
        self
    }

    /// Queue a failed read.
    pub fn with_error(self, message: &str) -> Self {
        self.snapshots
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseSheetSource for MockSheetSource {
    async fn metadata(&self) -> Result<SheetMetadata> {
        Ok(self.metadata.clone())
    }

    async fn rows(&self) -> Result<SheetRows> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let next = self.snapshots.lock().unwrap().pop_front();
        match next {
            Some(Ok(rows)) => {
                *self.last.lock().unwrap() = Some(rows.clone());
                Ok(rows)
            }
            Some(Err(message)) => Err(anyhow!(message)),
            None => Ok(self.last.lock().unwrap().clone().unwrap_or_default()),
        }
    }

    async fn refresh(&self) -> Result<()> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// Mock Product Catalog
// =============================================================================

pub struct MockProductCatalog {
    products: Mutex<Vec<CatalogProduct>>,
    created: Mutex<Vec<NewProduct>>,
    failing_skus: HashSet<String>,
    next_id: AtomicI64,
}

impl MockProductCatalog {
    pub fn new() -> Self {
        Self {
            products: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
            failing_skus: HashSet::new(),
            next_id: AtomicI64::new(1000),
        }
    }

    /// Seed a product that already exists in the store.
    pub fn with_existing(self, id: i64, sku: &str) -> Self {
        self.products.lock().unwrap().push(CatalogProduct {
            id,
            title: sku.to_string(),
            sku: Some(sku.to_string()),
        });
        self
    }

    /// Make creation of `sku` fail with an API error.
    pub fn failing_on(mut self, sku: &str) -> Self {
        self.failing_skus.insert(sku.to_string());
        self
    }

    /// Payloads received by `create_product`, in call order.
    pub fn created(&self) -> Vec<NewProduct> {
        self.created.lock().unwrap().clone()
    }
}

impl Default for MockProductCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseProductCatalog for MockProductCatalog {
    async fn list_products(&self) -> Result<Vec<CatalogProduct>> {
        Ok(self.products.lock().unwrap().clone())
    }

    async fn create_product(&self, product: &NewProduct) -> Result<CatalogProduct> {
        let sku = product.variants.first().map(|v| v.sku.clone());
        if let Some(sku) = &sku {
            if self.failing_skus.contains(sku) {
                return Err(anyhow!("Shopify API error (422): invalid product {}", sku));
            }
        }

        self.created.lock().unwrap().push(product.clone());
        let stored = CatalogProduct {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title: product.title.clone(),
            sku,
        };
        self.products.lock().unwrap().push(stored.clone());
        Ok(stored)
    }
}

// =============================================================================
// Mock Page Fetcher
// =============================================================================

pub struct MockPageFetcher {
    pages: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Serve `html` for `url`; unknown URLs fail like an HTTP 404.
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePageFetcher for MockPageFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("HTTP 404 Not Found for {}", url))
    }
}
