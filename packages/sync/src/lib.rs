// Sheets → Shopify catalog sync - core library
//
// Reads the product catalog kept in a Google Sheets worksheet, publishes new
// products to Shopify and records every synced product in PostgreSQL.
// Vendor price lookups and manifest checks live alongside.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
