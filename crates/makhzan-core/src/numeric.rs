//! Lenient numeric normalization.
//!
//! Record fields and formatter inputs arrive loosely typed: missing values,
//! numeric strings, `NaN`. Everything funnels through [`coerce_numeric`], which
//! maps anything it cannot read as a finite number to zero.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

/// A value that can be read as a number, falling back to zero.
pub trait Numeric {
    fn to_decimal(&self) -> Option<Decimal>;
}

/// Normalizes `value` to a `Decimal`, treating anything unreadable as zero.
pub fn coerce_numeric<T: Numeric>(value: T) -> Decimal {
    value.to_decimal().unwrap_or(Decimal::ZERO)
}

impl Numeric for Decimal {
    fn to_decimal(&self) -> Option<Decimal> {
        Some(*self)
    }
}

impl Numeric for f64 {
    fn to_decimal(&self) -> Option<Decimal> {
        if !self.is_finite() {
            return None;
        }
        Decimal::try_from(*self).ok()
    }
}

impl Numeric for f32 {
    fn to_decimal(&self) -> Option<Decimal> {
        f64::from(*self).to_decimal()
    }
}

macro_rules! impl_numeric_for_int {
    ($($ty:ty),*) => {
        $(
            impl Numeric for $ty {
                fn to_decimal(&self) -> Option<Decimal> {
                    Some(Decimal::from(*self))
                }
            }
        )*
    };
}

impl_numeric_for_int!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl Numeric for str {
    fn to_decimal(&self) -> Option<Decimal> {
        let trimmed = self.trim();
        if trimmed.is_empty() {
            return Some(Decimal::ZERO);
        }
        Decimal::from_str(trimmed)
            .ok()
            .or_else(|| Decimal::from_scientific(trimmed).ok())
            .or_else(|| trimmed.parse::<f64>().ok().and_then(|v| v.to_decimal()))
    }
}

impl Numeric for String {
    fn to_decimal(&self) -> Option<Decimal> {
        self.as_str().to_decimal()
    }
}

impl Numeric for Value {
    fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    Some(Decimal::from(int))
                } else if let Some(int) = number.as_u64() {
                    Some(Decimal::from(int))
                } else {
                    number.as_f64().and_then(|v| v.to_decimal())
                }
            }
            Value::String(text) => text.to_decimal(),
            _ => None,
        }
    }
}

impl<T: Numeric + ?Sized> Numeric for &T {
    fn to_decimal(&self) -> Option<Decimal> {
        (**self).to_decimal()
    }
}

impl<T: Numeric> Numeric for Option<T> {
    fn to_decimal(&self) -> Option<Decimal> {
        self.as_ref().and_then(|value| value.to_decimal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_and_invalid_values_become_zero() {
        assert_eq!(coerce_numeric(None::<f64>), Decimal::ZERO);
        assert_eq!(coerce_numeric(f64::NAN), Decimal::ZERO);
        assert_eq!(coerce_numeric(f64::INFINITY), Decimal::ZERO);
        assert_eq!(coerce_numeric("abc"), Decimal::ZERO);
        assert_eq!(coerce_numeric(""), Decimal::ZERO);
        assert_eq!(coerce_numeric(json!(null)), Decimal::ZERO);
        assert_eq!(coerce_numeric(json!(true)), Decimal::ZERO);
        assert_eq!(coerce_numeric(json!({"amount": 5})), Decimal::ZERO);
    }

    #[test]
    fn numeric_strings_are_parsed() {
        assert_eq!(coerce_numeric("42"), Decimal::from(42));
        assert_eq!(coerce_numeric(" 12.5 "), Decimal::new(125, 1));
        assert_eq!(coerce_numeric("-3"), Decimal::from(-3));
        assert_eq!(coerce_numeric("1e3"), Decimal::from(1000));
        assert_eq!(coerce_numeric(json!("7.25")), Decimal::new(725, 2));
    }

    #[test]
    fn numbers_pass_through() {
        assert_eq!(coerce_numeric(100), Decimal::from(100));
        assert_eq!(coerce_numeric(Some(8u32)), Decimal::from(8));
        assert_eq!(coerce_numeric(0.5f64), Decimal::new(5, 1));
        assert_eq!(coerce_numeric(json!(12)), Decimal::from(12));
        assert_eq!(coerce_numeric(json!(2.5)), Decimal::new(25, 1));
    }
}
