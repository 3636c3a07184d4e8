pub mod diagnostics;
pub mod publish;
pub mod watcher;

pub use diagnostics::{find_duplicate_part_numbers, run_diagnostics, DiagnosticsReport};
pub use publish::{plan_sync, sku_index, sync_products, SyncAction, SyncReport};
pub use watcher::{SheetChange, SheetWatcher};
