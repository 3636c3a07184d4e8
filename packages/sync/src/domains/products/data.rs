use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopify_client::{NewProduct, NewVariant};

use super::record::ProductRecord;
use crate::common::clean_sheet_price;

/// Catalog product built from a sheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductData {
    pub part: String,
    pub price: Decimal,
    /// Grams.
    pub weight: i32,
    pub tag: String,
    pub collection: String,
}

impl ProductData {
    pub fn from_record(record: &ProductRecord) -> Self {
        Self {
            part: record.part_no().to_string(),
            price: clean_sheet_price(record.get("price").unwrap_or("")),
            weight: parse_weight(record.get("weight").unwrap_or("")),
            tag: record.get("tag").unwrap_or("").to_string(),
            collection: record.get("collection").unwrap_or("").to_string(),
        }
    }

    /// Shopify Admin API payload for this product.
    pub fn to_new_product(&self, vendor: &str) -> NewProduct {
        NewProduct {
            title: self.part.clone(),
            body_html: format!("<strong>Part number: {}</strong>", self.part),
            vendor: vendor.to_string(),
            product_type: self.collection.clone(),
            tags: self.tag.clone(),
            variants: vec![NewVariant {
                price: format!("{:.2}", self.price.round_dp(2)),
                sku: self.part.clone(),
                weight: self.weight,
                weight_unit: "g".to_string(),
            }],
        }
    }
}

/// Whole grams from a cell like `"200"` or `"200.7"`; anything else is 0.
pub fn parse_weight(raw: &str) -> i32 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0;
    }
    match raw.parse::<f64>() {
        Ok(w) if w.is_finite() => w.trunc().clamp(i32::MIN as f64, i32::MAX as f64) as i32,
        _ => {
            tracing::warn!(raw, "Could not convert weight");
            0
        }
    }
}
