//! Test fixtures for building sheet rows and product data.

use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use sync_core::domains::products::ProductData;
use sync_core::kernel::test_dependencies::raw_record;
use sync_core::kernel::RawRecord;

static NEXT_PART: AtomicUsize = AtomicUsize::new(1);

/// Part number no other test in this run will use.
pub fn unique_part_no(prefix: &str) -> String {
    let n = NEXT_PART.fetch_add(1, Ordering::SeqCst);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    format!("{}-{}-{}", prefix, n, nanos)
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).expect("valid decimal")
}

/// A worksheet row the way the Sheets API returns it.
pub fn sheet_row(part_no: &str, price: &str, weight: &str) -> RawRecord {
    raw_record(&[
        ("Part No", part_no),
        ("Price", price),
        ("Weight", weight),
        ("Tag", "voip"),
        ("Collection", "Phones"),
    ])
}

pub fn product_data(part: &str, price: &str, weight: i32) -> ProductData {
    ProductData {
        part: part.to_string(),
        price: dec(price),
        weight,
        tag: "voip".to_string(),
        collection: "Phones".to_string(),
    }
}
