//! Price text cleaning for sheet cells and scraped vendor pages.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a price typed into the sheet: `"$1,234.50"`, `" 14.99 "`, `"＄9"`.
///
/// Blank or unparsable input yields zero.
pub fn clean_sheet_price(raw: &str) -> Decimal {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | ' ' | '$' | '＄'))
        .collect();

    if cleaned.is_empty() {
        return Decimal::ZERO;
    }

    match Decimal::from_str(&cleaned) {
        Ok(price) => price,
        Err(_) => {
            tracing::warn!(raw, "Could not convert price");
            Decimal::ZERO
        }
    }
}

/// Parse a price out of scraped page text such as `"Price: $1,299.00"`.
///
/// Everything but digits and the decimal point is discarded first.
pub fn clean_scraped_price(text: &str) -> Decimal {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return Decimal::ZERO;
    }

    Decimal::from_str(&cleaned).unwrap_or(Decimal::ZERO)
}
