//! Kernel module - infrastructure adapters and dependencies.

pub mod deps;
pub mod page_fetcher;
pub mod sheet_source;
pub mod shopify_catalog;
pub mod test_dependencies;
pub mod traits;

pub use deps::SyncDeps;
pub use page_fetcher::HttpPageFetcher;
pub use sheet_source::GoogleSheetSource;
pub use shopify_catalog::ShopifyCatalog;
pub use traits::*;
