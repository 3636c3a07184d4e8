//! Shopify adapter for `BaseProductCatalog`.

use anyhow::Result;
use async_trait::async_trait;
use shopify_client::{NewProduct, Product, ShopifyClient};
use std::sync::Arc;

use super::{BaseProductCatalog, CatalogProduct};

/// Wrapper around ShopifyClient that implements BaseProductCatalog trait
pub struct ShopifyCatalog(pub Arc<ShopifyClient>);

impl ShopifyCatalog {
    pub fn new(client: Arc<ShopifyClient>) -> Self {
        Self(client)
    }
}

impl From<Product> for CatalogProduct {
    fn from(product: Product) -> Self {
        Self {
            sku: product.primary_sku().map(str::to_string),
            id: product.id,
            title: product.title,
        }
    }
}

#[async_trait]
impl BaseProductCatalog for ShopifyCatalog {
    async fn list_products(&self) -> Result<Vec<CatalogProduct>> {
        let products = self.0.list_products().await?;
        Ok(products.into_iter().map(Into::into).collect())
    }

    async fn create_product(&self, product: &NewProduct) -> Result<CatalogProduct> {
        let created = self.0.create_product(product).await?;
        Ok(created.into())
    }
}
