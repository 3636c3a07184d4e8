//! Sync dependencies (using traits for testability)
//!
//! Central dependency container handed to domain operations. External
//! services sit behind trait objects so tests can swap in mocks.

use anyhow::{Context, Result};
use shopify_client::{ShopifyClient, ShopifyOptions};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;
use crate::kernel::{
    BasePageFetcher, BaseProductCatalog, BaseSheetSource, GoogleSheetSource, HttpPageFetcher,
    ShopifyCatalog,
};

const MAX_DB_CONNECTIONS: u32 = 5;

#[derive(Clone)]
pub struct SyncDeps {
    pub db_pool: PgPool,
    pub sheets: Arc<dyn BaseSheetSource>,
    pub catalog: Arc<dyn BaseProductCatalog>,
    pub fetcher: Arc<dyn BasePageFetcher>,
    /// Vendor name stamped on products published to the store
    pub shopify_vendor: String,
}

impl SyncDeps {
    pub fn new(
        db_pool: PgPool,
        sheets: Arc<dyn BaseSheetSource>,
        catalog: Arc<dyn BaseProductCatalog>,
        fetcher: Arc<dyn BasePageFetcher>,
        shopify_vendor: String,
    ) -> Self {
        Self {
            db_pool,
            sheets,
            catalog,
            fetcher,
            shopify_vendor,
        }
    }

    /// Wire production services from configuration.
    ///
    /// The pool connects lazily, so commands that never touch the database
    /// work without one.
    pub fn from_config(config: &Config) -> Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(MAX_DB_CONNECTIONS)
            .connect_lazy(&config.database.connection_string())
            .context("Invalid database connection string")?;

        let sheets = GoogleSheetSource::from_credentials(
            &config.sheets.credentials_path,
            config.sheets.sheet_id.clone(),
            config.sheets.worksheet.clone(),
        )?;

        let shopify = ShopifyClient::new(ShopifyOptions {
            shop_url: config.shopify.shop_url.clone(),
            access_token: config.shopify.access_token.clone(),
            api_version: config.shopify.api_version.clone(),
        });

        Ok(Self::new(
            db_pool,
            Arc::new(sheets),
            Arc::new(ShopifyCatalog::new(Arc::new(shopify))),
            Arc::new(HttpPageFetcher::new()?),
            config.shopify.vendor.clone(),
        ))
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.db_pool)
            .await
            .context("Failed to run migrations")?;
        tracing::info!("Migrations complete");
        Ok(())
    }
}
