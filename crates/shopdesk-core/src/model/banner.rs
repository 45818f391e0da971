// ── Storefront banner ──

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceId, null_as_default};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    #[serde(alias = "_id")]
    pub id: ResourceId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub salestext: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub button_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub button_link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default, alias = "isActive", deserialize_with = "null_as_default")]
    pub active: bool,
}

impl Resource for Banner {
    const KIND: &'static str = "banner";

    fn id(&self) -> &ResourceId {
        &self.id
    }
}
