// ── Categories ──

use serde_json::json;
use shopdesk_api::{Method, routes};

use super::{RemoteCall, ResourceView, require, set_field};
use crate::error::CoreError;
use crate::model::{Category, ResourceId};
use crate::store::{LocalMutation, MutationOutcome};
use crate::transport::Transport;

impl<C: Transport + Clone> ResourceView<Category, C> {
    pub async fn toggle(&self, id: &ResourceId) -> Result<MutationOutcome<Category>, CoreError> {
        let next = !require(&self.store, id)?.active;
        let call = RemoteCall::new(Method::PUT, routes::category_status(&id.to_string()))
            .body(json!({ "status": next }));
        self.mutate(id, set_field("active", json!(next)), call).await
    }

    pub async fn delete(&self, id: &ResourceId) -> Result<MutationOutcome<Category>, CoreError> {
        let call = RemoteCall::new(Method::DELETE, routes::category(&id.to_string()));
        self.mutate(id, LocalMutation::Remove, call).await
    }
}
