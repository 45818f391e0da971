// ── Catalog product ──

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: ResourceId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

impl Resource for Product {
    const KIND: &'static str = "product";

    fn id(&self) -> &ResourceId {
        &self.id
    }
}
