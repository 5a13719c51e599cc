use std::collections::HashMap;

use chrono::NaiveDate;
use makhzan_core::{Product, PurchaseInvoice, PurchaseInvoiceItem, RecordId, Unit};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Running totals behind a weighted-average purchase price.
///
/// Cost is price times quantity as recorded on the line, in whatever unit
/// the line used. Quantity is converted to smallest units. The two are not
/// in the same unit for `largest` lines; that mismatch is how posted
/// averages have always been computed and is kept as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseCostAccumulator {
    pub total_cost: Decimal,
    pub total_quantity: Decimal,
}

impl PurchaseCostAccumulator {
    pub fn record(&mut self, item: &PurchaseInvoiceItem, conversion_factor: u32) {
        let quantity = match item.unit {
            Unit::Largest => item.quantity.checked_mul(Decimal::from(conversion_factor)),
            Unit::Smallest | Unit::Unknown => Some(item.quantity),
        };
        let cost = item.price.checked_mul(item.quantity);

        let (Some(quantity), Some(cost)) = (quantity, cost) else {
            return;
        };
        let (Some(total_cost), Some(total_quantity)) = (
            self.total_cost.checked_add(cost),
            self.total_quantity.checked_add(quantity),
        ) else {
            return;
        };

        self.total_cost = total_cost;
        self.total_quantity = total_quantity;
    }

    pub fn average_cost(&self) -> Decimal {
        if self.total_quantity.is_zero() {
            return Decimal::ZERO;
        }
        self.total_cost
            .checked_div(self.total_quantity)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Purchase records indexed for repeated average-price lookups.
pub struct PurchaseHistory<'a> {
    products: HashMap<&'a RecordId, &'a Product>,
    invoices: HashMap<&'a RecordId, &'a PurchaseInvoice>,
    items: &'a [PurchaseInvoiceItem],
}

impl<'a> PurchaseHistory<'a> {
    pub fn new(
        products: &'a [Product],
        invoices: &'a [PurchaseInvoice],
        items: &'a [PurchaseInvoiceItem],
    ) -> Self {
        Self {
            products: products.iter().map(|p| (&p.id, p)).collect(),
            invoices: invoices.iter().map(|i| (&i.id, i)).collect(),
            items,
        }
    }

    /// Totals for `product_id` over lines whose invoice is dated on or before
    /// `as_of`. `None` for unknown products.
    pub fn accumulate(
        &self,
        product_id: &RecordId,
        as_of: Option<NaiveDate>,
    ) -> Option<PurchaseCostAccumulator> {
        let product = self.products.get(product_id)?;
        let factor = product.conversion_factor();
        let cutoff = as_of.map(|date| date.format("%Y-%m-%d").to_string());

        let mut totals = PurchaseCostAccumulator::default();
        for item in self.items.iter().filter(|item| item.product_id == *product_id) {
            let Some(invoice) = self.invoices.get(&item.invoice_id) else {
                continue;
            };
            if let Some(cutoff) = cutoff.as_deref() {
                if invoice.day() > cutoff {
                    continue;
                }
            }
            totals.record(item, factor);
        }

        Some(totals)
    }

    pub fn average_price(&self, product_id: &RecordId, as_of: Option<NaiveDate>) -> Decimal {
        self.accumulate(product_id, as_of)
            .map(|totals| totals.average_cost())
            .unwrap_or(Decimal::ZERO)
    }
}

/// Weighted-average purchase price of `product_id` per smallest unit,
/// optionally limited to invoices dated on or before `as_of`. Zero when the
/// product is unknown or has no qualifying purchases.
pub fn average_purchase_price(
    product_id: &RecordId,
    as_of: Option<NaiveDate>,
    products: &[Product],
    invoices: &[PurchaseInvoice],
    items: &[PurchaseInvoiceItem],
) -> Decimal {
    PurchaseHistory::new(products, invoices, items).average_price(product_id, as_of)
}
