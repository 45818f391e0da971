// ── Discount coupon ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{Resource, ResourceId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DiscountKind {
    #[default]
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    #[serde(alias = "_id")]
    pub id: ResourceId,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub discount_type: DiscountKind,
    #[serde(default)]
    pub discount_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_order_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(default, alias = "status", alias = "isActive")]
    pub active: bool,
}

impl Coupon {
    /// "15%" or "250" depending on the discount kind.
    pub fn discount_label(&self) -> String {
        match self.discount_type {
            DiscountKind::Percentage => format!("{}%", self.discount_value),
            DiscountKind::Fixed => format!("{}", self.discount_value),
        }
    }
}

impl Resource for Coupon {
    const KIND: &'static str = "coupon";

    fn id(&self) -> &ResourceId {
        &self.id
    }
}
