use std::sync::Arc;

use chrono::{Datelike, Local};
use makhzan_core::CounterStore;
use tracing::debug;

use crate::error::SequenceError;

pub const INVOICE_COUNTER_KEY: &str = "invoice_counter";

/// Issues `INV-{year}-NNN` invoice numbers from a single running counter.
/// The counter is not reset when the year changes.
pub struct InvoiceNumberGenerator {
    counters: Arc<dyn CounterStore>,
}

impl InvoiceNumberGenerator {
    pub fn new(counters: Arc<dyn CounterStore>) -> Self {
        Self { counters }
    }

    /// Next number, stamped with the current local calendar year.
    pub async fn generate(&self) -> Result<String, SequenceError> {
        self.generate_for_year(Local::now().year()).await
    }

    pub async fn generate_for_year(&self, year: i32) -> Result<String, SequenceError> {
        let counter = self.counters.increment(INVOICE_COUNTER_KEY).await?;
        let number = format!("INV-{year}-{counter:03}");
        debug!(number = %number, "issued invoice number");
        Ok(number)
    }
}
