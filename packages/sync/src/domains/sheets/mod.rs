pub mod reader;

pub use reader::{normalize_rows, SheetReader};
