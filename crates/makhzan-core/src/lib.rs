pub mod error;
pub mod id;
pub mod models;
pub mod numeric;
pub mod storage;

pub use error::StoreError;
pub use id::RecordId;
pub use models::{Product, PurchaseInvoice, PurchaseInvoiceItem, Unit};
pub use numeric::{Numeric, coerce_numeric};
pub use storage::{
    CounterStore, PRODUCTS, PURCHASE_INVOICE_ITEMS, PURCHASE_INVOICES, RecordStore, fetch_records,
    parse_counter,
};
