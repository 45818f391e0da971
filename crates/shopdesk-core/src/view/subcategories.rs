// ── Subcategories ──

use serde_json::json;
use shopdesk_api::{Method, routes};

use super::{RemoteCall, ResourceView, require, set_field};
use crate::error::CoreError;
use crate::model::{ResourceId, Subcategory};
use crate::store::MutationOutcome;
use crate::transport::Transport;

impl<C: Transport + Clone> ResourceView<Subcategory, C> {
    pub async fn toggle(&self, id: &ResourceId) -> Result<MutationOutcome<Subcategory>, CoreError> {
        let next = !require(&self.store, id)?.active;
        let call = RemoteCall::new(Method::PUT, routes::subcategory_status(&id.to_string()))
            .body(json!({ "status": next }));
        self.mutate(id, set_field("active", json!(next)), call).await
    }
}
