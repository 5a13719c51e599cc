use makhzan_core::Numeric;
use serde::{Deserialize, Serialize};

use crate::arabic::{DEFAULT_CURRENCY, DEFAULT_DECIMALS, format_currency, format_number};

/// Report-wide formatting defaults: the currency label and how many fraction
/// digits amounts carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    pub currency: String,
    pub decimals: u32,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl NumberFormat {
    pub fn number<T: Numeric>(&self, value: T) -> String {
        format_number(value, self.decimals)
    }

    pub fn currency<T: Numeric>(&self, amount: T) -> String {
        format_currency(amount, &self.currency, self.decimals)
    }
}
