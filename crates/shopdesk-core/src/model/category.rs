// ── Product category ──

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceId, null_as_default};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    #[serde(alias = "_id")]
    pub id: ResourceId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, alias = "status", alias = "isActive", deserialize_with = "null_as_default")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(alias = "_id")]
    pub id: ResourceId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, alias = "status", alias = "isActive")]
    pub active: bool,
    #[serde(default, alias = "subCategories")]
    pub subcategories: Vec<Subcategory>,
}

impl Resource for Subcategory {
    const KIND: &'static str = "subcategory";

    fn id(&self) -> &ResourceId {
        &self.id
    }
}

impl Resource for Category {
    const KIND: &'static str = "category";

    fn id(&self) -> &ResourceId {
        &self.id
    }
}
