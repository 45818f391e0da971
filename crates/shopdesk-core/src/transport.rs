// ── Transport capability ──
//
// The sync engine never talks HTTP itself. Views reach the backend
// through this trait, which `AdminClient` implements and tests can fake.

use std::future::Future;

use serde_json::Value;
use shopdesk_api::{AdminClient, Method};

use crate::error::CoreError;

/// Fetch collections and send mutations to the backend.
pub trait Transport: Send + Sync + 'static {
    /// GET a collection endpoint and return its raw items.
    fn fetch_collection(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<Vec<Value>, CoreError>> + Send;

    /// Send a mutation. Returns the response body, if any.
    fn send_mutation(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> impl Future<Output = Result<Option<Value>, CoreError>> + Send;
}

impl Transport for AdminClient {
    async fn fetch_collection(&self, path: &str) -> Result<Vec<Value>, CoreError> {
        Ok(self.get_list(path).await?)
    }

    async fn send_mutation(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Option<Value>, CoreError> {
        Ok(self.send(method, path, body.as_ref()).await?)
    }
}
