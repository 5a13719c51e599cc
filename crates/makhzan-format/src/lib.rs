pub mod arabic;
pub mod profile;

pub use arabic::{
    DECIMAL_SEPARATOR, DEFAULT_CURRENCY, DEFAULT_DECIMALS, GROUP_SEPARATOR, format_currency,
    format_number, format_percentage, to_arabic_digits,
};
pub use profile::NumberFormat;
