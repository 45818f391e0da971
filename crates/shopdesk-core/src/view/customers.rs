// ── Customers ──

use serde_json::json;
use shopdesk_api::{Method, routes};

use super::{RemoteCall, ResourceView, require, set_field};
use crate::error::CoreError;
use crate::model::{Customer, CustomerStatus, ResourceId};
use crate::store::MutationOutcome;
use crate::transport::Transport;

impl<C: Transport + Clone> ResourceView<Customer, C> {
    /// Flip a customer between active and inactive. The flip shows
    /// immediately and is reverted if the backend rejects it.
    pub async fn toggle_status(
        &self,
        id: &ResourceId,
    ) -> Result<MutationOutcome<Customer>, CoreError> {
        let next = require(&self.store, id)?.status.toggled();
        self.set_status(id, next).await
    }

    pub async fn set_status(
        &self,
        id: &ResourceId,
        status: CustomerStatus,
    ) -> Result<MutationOutcome<Customer>, CoreError> {
        let call = RemoteCall::new(Method::PUT, routes::customer_status(&id.to_string()))
            .body(json!({ "userId": id, "status": status }));
        self.mutate(id, set_field("status", json!(status)), call).await
    }
}
