pub mod data;
pub mod models;
pub mod record;

pub use data::{parse_weight, ProductData};
pub use models::Product;
pub use record::{
    is_blank_row, normalize_fields, normalize_header, products_fingerprint, ProductRecord,
    FIRST_DATA_ROW, PART_NO,
};
