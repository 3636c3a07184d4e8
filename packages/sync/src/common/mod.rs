pub mod content_hash;
pub mod manifest;
pub mod price;

pub use content_hash::generate_content_hash;
pub use manifest::{Manifest, ManifestError, ManifestGroup, Requirement};
pub use price::{clean_scraped_price, clean_sheet_price};
