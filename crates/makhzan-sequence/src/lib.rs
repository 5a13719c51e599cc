pub mod error;
pub mod invoice;
pub mod product;

pub use error::SequenceError;
pub use invoice::{INVOICE_COUNTER_KEY, InvoiceNumberGenerator};
pub use product::{PRODUCT_CODE_COUNTER_KEY, PRODUCT_CODE_PREFIX, ProductCodeGenerator};
