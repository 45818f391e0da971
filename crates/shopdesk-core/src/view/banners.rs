// ── Banners ──

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Value, json};
use shopdesk_api::{Method, routes};

use super::{RemoteCall, ResourceView, require, set_field};
use crate::error::CoreError;
use crate::model::{Banner, ResourceId};
use crate::store::{LocalMutation, MutationOutcome};
use crate::transport::Transport;

/// Source of provisional ids for banners the server has not assigned yet.
static DRAFTS: AtomicU64 = AtomicU64::new(1);

impl<C: Transport + Clone> ResourceView<Banner, C> {
    /// Add a banner. The draft's own id is ignored: the banner is listed at
    /// once under a provisional `draft-N` id, which the server-assigned id
    /// replaces in place when the backend answers with the stored banner.
    pub async fn create(&self, draft: Banner) -> Result<MutationOutcome<Banner>, CoreError> {
        let id = ResourceId::Text(format!("draft-{}", DRAFTS.fetch_add(1, Ordering::Relaxed)));
        if draft.title.trim().is_empty() {
            return Err(CoreError::InvalidPatch {
                id: id.to_string(),
                reason: "banner title is required".into(),
            });
        }

        let mut body = serde_json::to_value(&draft).map_err(|e| CoreError::InvalidPatch {
            id: id.to_string(),
            reason: e.to_string(),
        })?;
        if let Value::Object(fields) = &mut body {
            fields.remove("id");
        }

        let item = Banner {
            id: id.clone(),
            ..draft
        };
        let call = RemoteCall::new(Method::POST, routes::BANNERS)
            .body(body)
            .returning_item();
        self.mutate(&id, LocalMutation::Insert(item), call).await
    }

    /// Flip `active`. The backend answers with the updated banner, which
    /// replaces the local copy.
    pub async fn toggle(&self, id: &ResourceId) -> Result<MutationOutcome<Banner>, CoreError> {
        let next = !require(&self.store, id)?.active;
        let call =
            RemoteCall::new(Method::PATCH, routes::banner_toggle(&id.to_string())).returning_item();
        self.mutate(id, set_field("active", json!(next)), call).await
    }

    /// Replace a banner's text fields and flags.
    pub async fn update(&self, banner: Banner) -> Result<MutationOutcome<Banner>, CoreError> {
        let id = banner.id.clone();
        let body = serde_json::to_value(&banner).map_err(|e| CoreError::InvalidPatch {
            id: id.to_string(),
            reason: e.to_string(),
        })?;
        let call = RemoteCall::new(Method::PUT, routes::banner(&id.to_string()))
            .body(body)
            .returning_item();
        self.mutate(&id, LocalMutation::Replace(banner), call).await
    }

    pub async fn delete(&self, id: &ResourceId) -> Result<MutationOutcome<Banner>, CoreError> {
        let call = RemoteCall::new(Method::DELETE, routes::banner(&id.to_string()));
        self.mutate(id, LocalMutation::Remove, call).await
    }

    pub fn active_count(&self) -> usize {
        self.snapshot().iter().filter(|b| b.active).count()
    }
}
