//! Money helpers using rust_decimal for precision
//!
//! Prices, totals and salaries are Vietnamese đồng. The backend sends them as
//! JSON numbers or decimal strings; both deserialize into [`Decimal`].

use rust_decimal::prelude::*;

/// Line total for a price and quantity
pub fn line_total(price: Decimal, quantity: u32) -> Decimal {
    price * Decimal::from(quantity)
}

/// Format an amount the way the back-office displays it: `1.234.567 đ`
///
/// Amounts are rounded to whole đồng (half away from zero).
pub fn format_vnd(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{} đ", grouped)
    } else {
        format!("{} đ", grouped)
    }
}
