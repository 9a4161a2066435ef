//! Integer minor-unit money handling.
//!
//! Every price and total in the system is an `i64` count of minor units (cents).
//! Decimal strings only exist at the presentation boundary, see [`format_amount`].

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(i64),
    #[error("unit price must not be negative, got {0}")]
    NegativePrice(i64),
    #[error("amount overflow")]
    Overflow,
    #[error("order must contain at least one item")]
    Empty,
}

/// Anything that can be priced as `quantity × unit_price`.
pub trait LineAmount {
    fn quantity(&self) -> i64;
    fn unit_price(&self) -> i64;
}

pub fn line_total(quantity: i64, unit_price: i64) -> Result<i64, MoneyError> {
    if quantity <= 0 {
        return Err(MoneyError::InvalidQuantity(quantity));
    }
    if unit_price < 0 {
        return Err(MoneyError::NegativePrice(unit_price));
    }
    quantity.checked_mul(unit_price).ok_or(MoneyError::Overflow)
}

pub fn order_total<T: LineAmount>(items: &[T]) -> Result<i64, MoneyError> {
    if items.is_empty() {
        return Err(MoneyError::Empty);
    }
    items.iter().try_fold(0i64, |acc, item| {
        let line = line_total(item.quantity(), item.unit_price())?;
        acc.checked_add(line).ok_or(MoneyError::Overflow)
    })
}

fn currency_prefix(currency: &str) -> String {
    match currency.to_ascii_lowercase().as_str() {
        "usd" | "cad" | "aud" => "$".to_string(),
        "eur" => "€".to_string(),
        "gbp" => "£".to_string(),
        "jpy" => "¥".to_string(),
        other => format!("{} ", other.to_uppercase()),
    }
}

/// Renders minor units as a display string, e.g. `2200, "usd"` → `"$22.00"`.
pub fn format_amount(cents: i64, currency: &str) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!(
        "{}{}{}.{:02}",
        sign,
        currency_prefix(currency),
        abs / 100,
        abs % 100
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Line(i64, i64);

    impl LineAmount for Line {
        fn quantity(&self) -> i64 {
            self.0
        }
        fn unit_price(&self) -> i64 {
            self.1
        }
    }

    #[test]
    fn sums_line_items() {
        let items = [Line(2, 500), Line(1, 1200)];
        assert_eq!(order_total(&items), Ok(2200));
    }

    #[test]
    fn rejects_bad_lines() {
        assert_eq!(line_total(0, 100), Err(MoneyError::InvalidQuantity(0)));
        assert_eq!(line_total(1, -1), Err(MoneyError::NegativePrice(-1)));
        assert_eq!(line_total(i64::MAX, 2), Err(MoneyError::Overflow));
        assert_eq!(order_total::<Line>(&[]), Err(MoneyError::Empty));
    }

    #[test]
    fn overflow_in_sum_is_caught() {
        let items = [Line(1, i64::MAX), Line(1, 1)];
        assert_eq!(order_total(&items), Err(MoneyError::Overflow));
    }

    #[test]
    fn formats_for_display() {
        assert_eq!(format_amount(2200, "usd"), "$22.00");
        assert_eq!(format_amount(5, "eur"), "€0.05");
        assert_eq!(format_amount(-1999, "gbp"), "-£19.99");
        assert_eq!(format_amount(123456, "chf"), "CHF 1234.56");
    }
}
