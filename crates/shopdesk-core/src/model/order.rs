// ── Order domain types ──

use chrono::DateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};

use super::{Resource, ResourceId, null_as_default};

/// Fulfilment state as reported by the backend.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    #[serde(rename = "Out for Delivery")]
    #[strum(to_string = "Out for Delivery", serialize = "out-for-delivery")]
    OutForDelivery,
    Delivered,
    Failed,
    #[serde(rename = "Return to Origin")]
    #[strum(to_string = "Return to Origin", serialize = "return-to-origin")]
    ReturnToOrigin,
    Returned,
    Cancelled,
}

impl OrderStatus {
    /// No further transitions are expected from this state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Delivered | Self::Returned | Self::Cancelled | Self::Failed
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PaymentMethod {
    #[default]
    Cod,
    Paid,
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: ResourceId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: OrderStatus,
    /// Line-item count. The backend sends either a count or the item array.
    #[serde(default, deserialize_with = "item_count")]
    pub items: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub payment_method: PaymentMethod,
    #[serde(rename = "reference_number", default, deserialize_with = "null_as_default")]
    pub reference_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
}

impl Order {
    /// `createdAt` as Unix milliseconds. The backend sends either an
    /// RFC 3339 string or epoch milliseconds.
    pub fn created_at_millis(&self) -> Option<i64> {
        match self.created_at.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .map(|at| at.timestamp_millis())
                .ok()
                .or_else(|| s.parse().ok()),
            _ => None,
        }
    }
}

impl Resource for Order {
    const KIND: &'static str = "order";

    fn id(&self) -> &ResourceId {
        &self.id
    }
}

fn item_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Value::deserialize(deserializer)? {
        Value::Array(items) => items.len(),
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or_default(),
        _ => 0,
    };
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn decodes_backend_order() {
        let order: Order = serde_json::from_value(json!({
            "_id": "66a1",
            "customer": "Ayesha Khan",
            "date": "2024-05-02",
            "total": 4200.5,
            "status": "Out for Delivery",
            "items": [{ "sku": "a" }, { "sku": "b" }],
            "paymentMethod": "paid",
            "reference_number": "REF-19"
        }))
        .unwrap();

        assert_eq!(order.id, ResourceId::from("66a1"));
        assert_eq!(order.status, OrderStatus::OutForDelivery);
        assert_eq!(order.items, 2);
        assert_eq!(order.payment_method, PaymentMethod::Paid);
        assert_eq!(order.reference_number, "REF-19");
    }

    #[test]
    fn mongo_id_wins_over_id_virtual() {
        let order: Order = crate::model::decode(json!({
            "_id": "64ab",
            "id": "ORD-1",
            "customer": "A",
            "status": "Pending",
            "reference_number": null,
            "total": null
        }))
        .unwrap();

        assert_eq!(order.id, ResourceId::from("64ab"));
        assert_eq!(order.reference_number, "");
        assert!(order.total.abs() < f64::EPSILON);
    }

    #[test]
    fn created_at_accepts_strings_and_epoch_millis() {
        let at = |value: serde_json::Value| {
            serde_json::from_value::<Order>(json!({ "id": "o", "createdAt": value }))
                .unwrap()
                .created_at_millis()
        };
        assert_eq!(at(json!("1970-01-01T00:00:01Z")), Some(1000));
        assert_eq!(at(json!(1_714_640_000_000_i64)), Some(1_714_640_000_000));
        assert_eq!(at(json!("1500")), Some(1500));
        assert_eq!(at(json!("yesterday")), None);
    }

    #[test]
    fn status_round_trips_through_display() {
        for status in OrderStatus::iter() {
            let parsed: OrderStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert_eq!(OrderStatus::iter().count(), 9);
    }

    #[test]
    fn status_parses_cli_spelling() {
        assert_eq!(
            "return-to-origin".parse::<OrderStatus>().unwrap(),
            OrderStatus::ReturnToOrigin
        );
        assert_eq!("shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
    }
}
