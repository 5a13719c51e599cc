use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::id::RecordId;
use crate::numeric::coerce_numeric;

/// Stocking granularity a purchase line was recorded in.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Smallest,
    Largest,
    Unknown,
}

impl Unit {
    /// Reads a stored unit. Only `"largest"` and `"smallest"` are recognised;
    /// null, numbers and other strings are `Unknown`.
    pub fn from_value(raw: &Value) -> Self {
        match raw.as_str() {
            Some("largest") => Self::Largest,
            Some("smallest") => Self::Smallest,
            _ => Self::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&raw))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: RecordId,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient_factor")]
    pub conversion_factor: Option<u32>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub smallest_unit_price: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub largest_unit_price: Decimal,
}

impl Product {
    /// Smallest units per largest unit. Missing or zero factors count as 1.
    pub fn conversion_factor(&self) -> u32 {
        match self.conversion_factor {
            Some(factor) if factor > 0 => factor,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseInvoice {
    pub id: RecordId,
    /// ISO-8601 timestamp as entered.
    pub date: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub total: Decimal,
}

impl PurchaseInvoice {
    /// The `YYYY-MM-DD` portion of the invoice timestamp.
    pub fn day(&self) -> &str {
        self.date.split('T').next().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseInvoiceItem {
    pub id: RecordId,
    pub invoice_id: RecordId,
    pub product_id: RecordId,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub quantity: Decimal,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Decimal,
}

fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(coerce_numeric(raw))
}

// Fractions truncate toward zero; negatives do not fit and read as missing.
fn lenient_factor<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    if raw.is_null() {
        return Ok(None);
    }
    Ok(coerce_numeric(raw).trunc().to_u32())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_fields_are_normalized_on_decode() {
        let item: PurchaseInvoiceItem = serde_json::from_value(json!({
            "id": RecordId::generate(),
            "invoiceId": RecordId::generate(),
            "productId": RecordId::generate(),
            "quantity": "12",
            "unit": "carton",
            "price": null,
        }))
        .unwrap();

        assert_eq!(item.quantity, Decimal::from(12));
        assert_eq!(item.unit, Unit::Unknown);
        assert_eq!(item.price, Decimal::ZERO);
    }

    #[test]
    fn unit_anomalies_decode_as_unknown() {
        for raw in [json!(null), json!(5), json!("carton"), json!({ "name": "box" })] {
            let item: PurchaseInvoiceItem = serde_json::from_value(json!({
                "id": 1,
                "invoiceId": 2,
                "productId": 3,
                "quantity": 10,
                "unit": raw,
                "price": 5,
            }))
            .unwrap();

            assert_eq!(item.unit, Unit::Unknown);
            assert_eq!(item.quantity, Decimal::from(10));
        }
    }

    #[test]
    fn missing_unit_defaults_to_smallest() {
        let item: PurchaseInvoiceItem = serde_json::from_value(json!({
            "id": 1,
            "invoiceId": 2,
            "productId": 3,
            "quantity": 4,
        }))
        .unwrap();

        assert_eq!(item.unit, Unit::Smallest);
    }

    #[test]
    fn integer_ids_decode() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "code": "PRD-00001",
            "conversionFactor": 12,
        }))
        .unwrap();
        let item: PurchaseInvoiceItem = serde_json::from_value(json!({
            "id": 10,
            "invoiceId": 7,
            "productId": 1,
            "quantity": 2,
            "unit": "largest",
            "price": 100,
        }))
        .unwrap();

        assert_eq!(product.id, RecordId::from(1i64));
        assert_eq!(item.product_id, product.id);
        assert_eq!(item.invoice_id, RecordId::from("7"));
        assert_eq!(item.unit, Unit::Largest);
    }

    #[test]
    fn product_defaults_apply_to_missing_fields() {
        let product: Product = serde_json::from_value(json!({ "id": RecordId::generate() })).unwrap();

        assert_eq!(product.code, None);
        assert_eq!(product.conversion_factor(), 1);
        assert_eq!(product.smallest_unit_price, Decimal::ZERO);
    }

    #[test]
    fn zero_conversion_factor_counts_as_one() {
        let product: Product = serde_json::from_value(json!({
            "id": RecordId::generate(),
            "conversionFactor": 0,
        }))
        .unwrap();

        assert_eq!(product.conversion_factor(), 1);
    }

    #[test]
    fn conversion_factor_accepts_numeric_strings() {
        let product: Product = serde_json::from_value(json!({
            "id": RecordId::generate(),
            "conversionFactor": "12",
        }))
        .unwrap();

        assert_eq!(product.conversion_factor(), 12);
    }

    #[test]
    fn fractional_and_negative_factors() {
        let decode = |factor: Value| -> u32 {
            let product: Product = serde_json::from_value(json!({
                "id": 1,
                "conversionFactor": factor,
            }))
            .unwrap();
            product.conversion_factor()
        };

        assert_eq!(decode(json!(2.5)), 2);
        assert_eq!(decode(json!("12.9")), 12);
        assert_eq!(decode(json!(0.5)), 1);
        assert_eq!(decode(json!(-3)), 1);
    }

    #[test]
    fn invoice_day_drops_time_of_day() {
        let invoice = PurchaseInvoice {
            id: RecordId::from(3i64),
            date: "2024-01-15T10:30:00.000Z".to_string(),
            total: Decimal::ZERO,
        };

        assert_eq!(invoice.day(), "2024-01-15");
    }
}
