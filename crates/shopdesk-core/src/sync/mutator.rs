// ── Optimistic mutation ──
//
// Local apply, remote call, then commit or rollback. The store changes
// synchronously before the request goes out, so the view reflects the
// user's action immediately.

use std::future::Future;
use std::sync::Arc;

use crate::error::CoreError;
use crate::model::{Resource, ResourceId};
use crate::store::{LocalMutation, MutationOutcome, PendingMutation, ResourceStore};

/// Runs optimistic mutations against one store.
///
/// At most one mutation per id is in flight; a second request for the
/// same id fails with [`CoreError::Busy`] instead of racing the first.
pub struct OptimisticMutator<T: Resource> {
    store: Arc<ResourceStore<T>>,
}

impl<T: Resource> Clone for OptimisticMutator<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<T: Resource> OptimisticMutator<T> {
    pub fn new(store: Arc<ResourceStore<T>>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<ResourceStore<T>> {
        &self.store
    }

    /// Apply `mutation` to `id` locally, await `remote`, then settle.
    ///
    /// - `remote` succeeds: the mutation is kept. An item returned by the
    ///   server replaces the local copy.
    /// - `remote` fails: the prior state is restored and
    ///   [`CoreError::MutationFailed`] is returned.
    /// - The store was invalidated meanwhile: nothing is committed or
    ///   restored and [`MutationOutcome::Discarded`] is returned.
    ///
    /// Dropping the returned future before it completes rolls the
    /// mutation back.
    pub async fn execute<F>(
        &self,
        id: &ResourceId,
        mutation: LocalMutation<T>,
        remote: F,
    ) -> Result<MutationOutcome<T>, CoreError>
    where
        F: Future<Output = Result<Option<T>, CoreError>>,
    {
        let kind = mutation.kind();
        let pending = self.store.begin(id, mutation).inspect_err(|e| {
            tracing::debug!(kind = T::KIND, %id, error = %e, "optimistic mutation rejected");
        })?;
        tracing::debug!(kind = T::KIND, %id, mutation = %kind, "optimistic mutation applied");

        let guard = PendingGuard {
            store: &self.store,
            pending: Some(pending),
        };
        let result = remote.await;
        let Some(pending) = guard.disarm() else {
            return Ok(MutationOutcome::Discarded);
        };

        match result {
            Ok(server) => {
                let outcome = self.store.commit(pending, server);
                match &outcome {
                    MutationOutcome::Committed(_) => {
                        tracing::debug!(kind = T::KIND, %id, "mutation committed");
                    }
                    MutationOutcome::Discarded => {
                        tracing::debug!(kind = T::KIND, %id, "store invalidated; result discarded");
                    }
                }
                Ok(outcome)
            }
            Err(source) => {
                if self.store.rollback(pending) {
                    tracing::warn!(kind = T::KIND, %id, error = %source, "mutation failed; rolled back");
                    Err(CoreError::MutationFailed {
                        id: id.to_string(),
                        source: Box::new(source),
                    })
                } else {
                    tracing::debug!(kind = T::KIND, %id, error = %source, "store invalidated; failure discarded");
                    Ok(MutationOutcome::Discarded)
                }
            }
        }
    }
}

/// Rolls a pending mutation back if the owning future is dropped.
struct PendingGuard<'a, T: Resource> {
    store: &'a ResourceStore<T>,
    pending: Option<PendingMutation<T>>,
}

impl<T: Resource> PendingGuard<'_, T> {
    fn disarm(mut self) -> Option<PendingMutation<T>> {
        self.pending.take()
    }
}

impl<T: Resource> Drop for PendingGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            tracing::debug!(kind = T::KIND, id = %pending.id(), "mutation abandoned; rolling back");
            self.store.rollback(pending);
        }
    }
}
