use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product payload for `POST products.json`.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub title: String,
    pub body_html: String,
    pub vendor: String,
    pub product_type: String,
    pub tags: String,
    pub variants: Vec<NewVariant>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewVariant {
    /// Decimal string with two places, e.g. `"14.99"`.
    pub price: String,
    pub sku: String,
    pub weight: i32,
    pub weight_unit: String,
}

/// A product as returned by the Admin API.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// SKU of the first variant, which is how catalog products are keyed.
    pub fn primary_sku(&self) -> Option<&str> {
        self.variants
            .first()
            .and_then(|v| v.sku.as_deref())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Variant {
    pub id: i64,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub weight_unit: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProductEnvelope<'a> {
    pub product: &'a NewProduct,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductResponse {
    pub product: Product,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductsResponse {
    pub products: Vec<Product>,
}
