// ── Coupons ──

use serde_json::json;
use shopdesk_api::{Method, routes};

use super::{RemoteCall, ResourceView, require, set_field};
use crate::error::CoreError;
use crate::model::{Coupon, ResourceId};
use crate::store::{LocalMutation, MutationOutcome};
use crate::transport::Transport;

impl<C: Transport + Clone> ResourceView<Coupon, C> {
    pub async fn toggle(&self, id: &ResourceId) -> Result<MutationOutcome<Coupon>, CoreError> {
        let next = !require(&self.store, id)?.active;
        let call = RemoteCall::new(Method::PATCH, routes::coupon_status(&id.to_string()))
            .body(json!({ "isActive": next }));
        self.mutate(id, set_field("active", json!(next)), call).await
    }

    pub async fn delete(&self, id: &ResourceId) -> Result<MutationOutcome<Coupon>, CoreError> {
        let call = RemoteCall::new(Method::DELETE, routes::coupon(&id.to_string()));
        self.mutate(id, LocalMutation::Remove, call).await
    }
}
