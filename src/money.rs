use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as pounds with thousands separators, e.g. `£1,234.50`.
/// Rounding to `decimals` places happens here and nowhere else.
pub fn format_gbp(amount: Decimal, decimals: u32) -> String {
    let rounded = amount.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let s = format!("{:.*}", decimals as usize, rounded.abs());
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (s.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac {
        Some(f) => format!("{sign}£{grouped}.{f}"),
        None => format!("{sign}£{grouped}"),
    }
}

/// Format a fractional rate as a percentage, e.g. `0.075` as `7.5%`
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

/// Read a price typed into a free-text field. Every non-digit character is dropped
/// (currency symbols, separators, signs, decimal points) and anything left empty
/// counts as zero.
pub fn parse_price_input(raw: &str) -> Decimal {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Decimal::ZERO;
    }
    digits.parse::<Decimal>().unwrap_or_else(|_| {
        log::warn!("Price input '{}' out of range, using 0", raw);
        Decimal::ZERO
    })
}
