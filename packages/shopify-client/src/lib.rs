//! Pure Shopify Admin REST API client.
//!
//! Covers the product endpoints the catalog sync needs: creating products and
//! listing every product in the store with cursor pagination.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_client::{ShopifyClient, ShopifyOptions};
//!
//! let client = ShopifyClient::new(ShopifyOptions {
//!     shop_url: "my-shop.myshopify.com".into(),
//!     access_token: "shpat_...".into(),
//!     api_version: "2024-01".into(),
//! });
//!
//! let products = client.list_products().await?;
//! println!("{} products in store", products.len());
//! ```

pub mod error;
pub mod types;

pub use error::{Result, ShopifyError};
pub use types::{NewProduct, NewVariant, Product, Variant};

use reqwest::header::{HeaderMap, LINK};
use types::{ProductEnvelope, ProductResponse, ProductsResponse};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Largest page size the Admin REST API accepts.
const PAGE_LIMIT: u32 = 250;

#[derive(Debug, Clone)]
pub struct ShopifyOptions {
    pub shop_url: String,
    pub access_token: String,
    pub api_version: String,
}

pub struct ShopifyClient {
    client: reqwest::Client,
    options: ShopifyOptions,
    base_url: String,
}

impl ShopifyClient {
    pub fn new(options: ShopifyOptions) -> Self {
        let base_url = format!(
            "{}/admin/api/{}",
            normalize_shop_url(&options.shop_url),
            options.api_version
        );
        Self {
            client: reqwest::Client::new(),
            options,
            base_url,
        }
    }

    /// Override the API root (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn options(&self) -> &ShopifyOptions {
        &self.options
    }

    /// Create a product. Shopify answers `201 Created` on success.
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        let url = format!("{}/products.json", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header(ACCESS_TOKEN_HEADER, &self.options.access_token)
            .json(&ProductEnvelope { product })
            .send()
            .await?;

        let status = resp.status();
        if status != reqwest::StatusCode::CREATED {
            let body = resp.text().await.unwrap_or_default();
            return Err(ShopifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let created: ProductResponse = resp.json().await?;
        tracing::info!(product_id = created.product.id, title = %created.product.title, "Shopify product created");
        Ok(created.product)
    }

    /// Every product in the store, following `Link: rel="next"` pages.
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let mut next = Some(format!("{}/products.json?limit={}", self.base_url, PAGE_LIMIT));
        let mut products = Vec::new();

        while let Some(url) = next.take() {
            let resp = self
                .client
                .get(&url)
                .header(ACCESS_TOKEN_HEADER, &self.options.access_token)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(ShopifyError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            next = next_page_url(resp.headers());
            let page: ProductsResponse = resp.json().await?;
            tracing::debug!(count = page.products.len(), has_next = next.is_some(), "Fetched product page");
            products.extend(page.products);
        }

        Ok(products)
    }

    /// First product whose primary variant carries `sku`.
    pub async fn find_product_by_sku(&self, sku: &str) -> Result<Option<Product>> {
        let products = self.list_products().await?;
        Ok(products.into_iter().find(|p| p.primary_sku() == Some(sku)))
    }
}

/// Accept `shop.myshopify.com`, `https://shop.myshopify.com/` and the like.
fn normalize_shop_url(shop_url: &str) -> String {
    let trimmed = shop_url.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

fn next_page_url(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(parse_next_link)
}

/// Extract the `rel="next"` target from a `Link` header value.
fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|p| {
            let p = p.trim();
            p == "rel=\"next\"" || p == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}
