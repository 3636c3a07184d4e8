//! Product model - one row per synced part number

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::domains::products::ProductData;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub part_no: String,
    pub price: Option<Decimal>,
    pub weight: Option<i32>,
    pub tag: Option<String>,
    pub collection: Option<String>,
    pub shopify_id: Option<i64>,
    pub last_synced: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Insert or update by part number and stamp `last_synced`.
    ///
    /// A `None` shopify id keeps whatever id is already stored.
    pub async fn upsert(data: &ProductData, shopify_id: Option<i64>, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO products (part_no, price, weight, tag, collection, shopify_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (part_no) DO UPDATE
            SET price = EXCLUDED.price,
                weight = EXCLUDED.weight,
                tag = EXCLUDED.tag,
                collection = EXCLUDED.collection,
                shopify_id = COALESCE(EXCLUDED.shopify_id, products.shopify_id),
                last_synced = NOW()
            RETURNING *
            "#,
        )
        .bind(&data.part)
        .bind(data.price.round_dp(2))
        .bind(data.weight)
        .bind(&data.tag)
        .bind(&data.collection)
        .bind(shopify_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_part_no(part_no: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM products WHERE part_no = $1")
            .bind(part_no)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM products ORDER BY part_no")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Products never published to Shopify.
    pub async fn find_unpublished(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM products
            WHERE shopify_id IS NULL
            ORDER BY part_no
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
