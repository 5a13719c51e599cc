//! Arabic-locale rendering of amounts.
//!
//! Digits are produced in ASCII first, grouped and joined, and only then
//! mapped to Eastern Arabic numerals. The separators are not digits, so the
//! final mapping leaves them alone.

use makhzan_core::{Numeric, coerce_numeric};
use rust_decimal::RoundingStrategy;

pub const DEFAULT_DECIMALS: u32 = 2;
pub const DEFAULT_CURRENCY: &str = "ج.م";

pub const GROUP_SEPARATOR: char = '\u{066C}';
pub const DECIMAL_SEPARATOR: char = '\u{066B}';

const ARABIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

// Largest scale a Decimal can carry.
const MAX_DECIMALS: u32 = 28;

/// Formats `value` with `decimals` fraction digits, Arabic separators and
/// Eastern Arabic digits. Unreadable input formats as zero, and so does
/// anything outside the range a `Decimal` can hold (magnitudes above about
/// 7.9e28), e.g. `1e30` renders as `٠٫٠٠`.
///
/// The sign takes part in digit grouping, so `-100` renders with a group
/// separator directly after the `-`.
pub fn format_number<T: Numeric>(value: T, decimals: u32) -> String {
    let decimals = decimals.min(MAX_DECIMALS);
    let rounded = coerce_numeric(value)
        .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let fixed = rounded.to_string();

    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (fixed.as_str(), ""),
    };

    let mut out = group_thousands(integer);
    if decimals > 0 {
        out.push(DECIMAL_SEPARATOR);
        out.push_str(fraction);
        for _ in fraction.len()..decimals as usize {
            out.push('0');
        }
    }

    to_arabic_digits(&out)
}

/// `format_number(amount, decimals)` followed by a space and `currency`.
pub fn format_currency<T: Numeric>(amount: T, currency: &str, decimals: u32) -> String {
    format!("{} {}", format_number(amount, decimals), currency)
}

/// Two-decimal `format_number` with a trailing `%`.
pub fn format_percentage<T: Numeric>(value: T) -> String {
    format!("{}%", format_number(value, 2))
}

fn group_thousands(integer: &str) -> String {
    let chars: Vec<char> = integer.chars().collect();
    let mut result = String::with_capacity(integer.len() + integer.len() / 3 * 2);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(GROUP_SEPARATOR);
        }
        result.push(c);
    }
    result
}

/// Replaces ASCII digits with Eastern Arabic ones; everything else is kept.
pub fn to_arabic_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(digit) if c.is_ascii_digit() => ARABIC_DIGITS[digit as usize],
            _ => c,
        })
        .collect()
}
