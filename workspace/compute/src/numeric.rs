use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::warn;

/// Parses a user-entered numeric string into a `Decimal`.
///
/// Accepts both the dot form (`1234.56`) and the locale form with comma as
/// decimal separator and dot as thousands separator (`1.234,56`). Returns
/// `None` when the text is not a number.
pub fn parse_locale_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // A comma marks the locale form; dots before it are thousands separators.
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };

    Decimal::from_str(&normalized).ok()
}

/// Like [`parse_locale_decimal`] but coerces unparsable input to zero, which
/// is the degraded behavior projection relies on: a bad stored value must
/// never abort a whole projection run.
pub fn parse_or_zero(raw: &str) -> Decimal {
    match parse_locale_decimal(raw) {
        Some(value) => value,
        None => {
            warn!("Unparsable numeric value {:?}, coercing to zero", raw);
            Decimal::ZERO
        }
    }
}
