// ── Products ──

use shopdesk_api::{Method, routes};

use super::{RemoteCall, ResourceView};
use crate::error::CoreError;
use crate::model::{Product, ResourceId};
use crate::store::{LocalMutation, MutationOutcome};
use crate::transport::Transport;

impl<C: Transport + Clone> ResourceView<Product, C> {
    pub async fn delete(&self, id: &ResourceId) -> Result<MutationOutcome<Product>, CoreError> {
        let call = RemoteCall::new(Method::DELETE, routes::product(&id.to_string()));
        self.mutate(id, LocalMutation::Remove, call).await
    }
}
