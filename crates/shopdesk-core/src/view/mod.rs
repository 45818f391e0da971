// ── View adapters ──
//
// A `ResourceView` binds one store, its mutator and an optional polling
// scheduler to a resource kind and its endpoints. Per-resource
// operations (toggle, delete, ...) live in the submodules as inherent
// impls on the matching `ResourceView<T>`.

mod banners;
mod categories;
mod coupons;
mod customers;
mod orders;
mod products;
mod subcategories;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::Value;
use shopdesk_api::{AdminClient, Method};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::error::CoreError;
use crate::model::{Resource, ResourceId, canonical_ids, decode};
use crate::store::{LocalMutation, MutationOutcome, ResourceStore};
use crate::stream::{ResourceStream, Snapshot};
use crate::sync::{ChangeNotifier, OptimisticMutator, PollingScheduler};
use crate::transport::Transport;

pub use orders::{OrderAlerts, OrderFilter};

pub type BannersView<C = AdminClient> = ResourceView<crate::model::Banner, C>;
pub type CategoriesView<C = AdminClient> = ResourceView<crate::model::Category, C>;
pub type CouponsView<C = AdminClient> = ResourceView<crate::model::Coupon, C>;
pub type CustomersView<C = AdminClient> = ResourceView<crate::model::Customer, C>;
pub type OrdersView<C = AdminClient> = ResourceView<crate::model::Order, C>;
pub type ProductsView<C = AdminClient> = ResourceView<crate::model::Product, C>;
pub type SubcategoriesView<C = AdminClient> = ResourceView<crate::model::Subcategory, C>;

/// The remote half of an optimistic mutation.
#[derive(Debug, Clone)]
pub struct RemoteCall {
    method: Method,
    path: String,
    body: Option<Value>,
    returns_item: bool,
}

impl RemoteCall {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            returns_item: false,
        }
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// The response body is the full updated item and replaces the local
    /// copy.
    pub fn returning_item(mut self) -> Self {
        self.returns_item = true;
        self
    }
}

/// One resource collection bound to its backend endpoints.
pub struct ResourceView<T: Resource, C: Transport + Clone = AdminClient> {
    transport: C,
    list_path: &'static str,
    store: Arc<ResourceStore<T>>,
    mutator: OptimisticMutator<T>,
    poll_interval: Duration,
    cancel: CancellationToken,
    scheduler: Mutex<Option<PollingScheduler>>,
}

impl<T: Resource, C: Transport + Clone> ResourceView<T, C> {
    pub fn new(
        transport: C,
        list_path: &'static str,
        poll_interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self::with_store(
            transport,
            list_path,
            poll_interval,
            cancel,
            Arc::new(ResourceStore::new()),
        )
    }

    /// A view whose refreshes report newly arrived items.
    pub fn with_notifier(
        transport: C,
        list_path: &'static str,
        poll_interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        let store = Arc::new(ResourceStore::with_notifier(ChangeNotifier::new()));
        Self::with_store(transport, list_path, poll_interval, cancel, store)
    }

    fn with_store(
        transport: C,
        list_path: &'static str,
        poll_interval: Duration,
        cancel: CancellationToken,
        store: Arc<ResourceStore<T>>,
    ) -> Self {
        Self {
            transport,
            list_path,
            mutator: OptimisticMutator::new(Arc::clone(&store)),
            store,
            poll_interval,
            cancel,
            scheduler: Mutex::new(None),
        }
    }

    // ── Reading ──────────────────────────────────────────────────────

    pub fn store(&self) -> &Arc<ResourceStore<T>> {
        &self.store
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> ResourceStream<T> {
        self.store.subscribe()
    }

    pub fn new_arrivals(&self) -> broadcast::Receiver<Vec<Arc<T>>> {
        self.store.new_arrivals()
    }

    pub fn get(&self, id: &ResourceId) -> Option<Arc<T>> {
        self.store.get(id)
    }

    /// Find an item by its rendered id (as typed by a user).
    pub fn find(&self, raw: &str) -> Option<Arc<T>> {
        self.store
            .snapshot()
            .iter()
            .find(|item| item.id().matches_str(raw))
            .cloned()
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Fetch the collection once and replace the store contents.
    /// Returns the items reported as new.
    pub async fn refresh(&self) -> Result<Vec<Arc<T>>, CoreError> {
        if self.cancel.is_cancelled() {
            return Err(CoreError::ConsoleDisconnected);
        }
        fetch_into(&self.transport, self.list_path, &self.store).await
    }

    /// Start background polling at the view's configured interval.
    ///
    /// `on_result` receives the new arrivals of each refresh, or the
    /// failure. Replaces any running schedule.
    pub fn start_polling<S>(&self, on_result: S)
    where
        S: FnMut(Result<Vec<Arc<T>>, CoreError>) + Send + 'static,
    {
        self.start_polling_every(self.poll_interval, on_result);
    }

    pub fn start_polling_every<S>(&self, interval: Duration, on_result: S)
    where
        S: FnMut(Result<Vec<Arc<T>>, CoreError>) + Send + 'static,
    {
        let transport = self.transport.clone();
        let store = Arc::clone(&self.store);
        let path = self.list_path;
        let live = self.cancel.child_token();

        let scheduler = PollingScheduler::start_with_token(
            live.clone(),
            interval,
            move || {
                let transport = transport.clone();
                let store = Arc::clone(&store);
                let live = live.clone();
                async move {
                    let items = fetch::<T, C>(&transport, path).await?;
                    // Stopped while fetching: leave the store alone.
                    if live.is_cancelled() {
                        return Ok(Vec::new());
                    }
                    Ok(store.replace_all(items))
                }
            },
            on_result,
        );

        if let Some(previous) = self.scheduler_slot().replace(scheduler) {
            previous.stop();
        }
        tracing::info!(kind = T::KIND, interval = ?interval, "background refresh started");
    }

    pub fn stop_polling(&self) {
        if let Some(scheduler) = self.scheduler_slot().take() {
            scheduler.stop();
            tracing::info!(kind = T::KIND, "background refresh stopped");
        }
    }

    /// Trigger an immediate background refresh. `false` when not polling
    /// or a refresh is already running.
    pub fn refresh_now(&self) -> bool {
        self.scheduler_slot()
            .as_ref()
            .is_some_and(PollingScheduler::refresh_now)
    }

    pub fn is_polling(&self) -> bool {
        self.scheduler_slot()
            .as_ref()
            .is_some_and(PollingScheduler::is_running)
    }

    /// Stop polling and detach pending mutations; their results will be
    /// ignored when they settle.
    pub fn teardown(&self) {
        self.stop_polling();
        self.store.invalidate();
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Apply `mutation` locally, then send `call`. Rolls back on failure.
    pub async fn mutate(
        &self,
        id: &ResourceId,
        mutation: LocalMutation<T>,
        call: RemoteCall,
    ) -> Result<MutationOutcome<T>, CoreError> {
        if self.cancel.is_cancelled() {
            return Err(CoreError::ConsoleDisconnected);
        }

        let transport = &self.transport;
        let remote = async move {
            let RemoteCall {
                method,
                path,
                body,
                returns_item,
            } = call;
            let response = transport.send_mutation(method, &path, body).await?;
            Ok::<_, CoreError>(response.filter(|_| returns_item).and_then(decode_reply::<T>))
        };

        self.mutator.execute(id, mutation, remote).await
    }

    fn scheduler_slot(&self) -> MutexGuard<'_, Option<PollingScheduler>> {
        self.scheduler.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Resource, C: Transport + Clone> Drop for ResourceView<T, C> {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn fetch<T: Resource, C: Transport>(transport: &C, path: &str) -> Result<Vec<T>, CoreError> {
    transport
        .fetch_collection(path)
        .await?
        .into_iter()
        .map(decode::<T>)
        .collect()
}

async fn fetch_into<T: Resource, C: Transport>(
    transport: &C,
    path: &str,
    store: &ResourceStore<T>,
) -> Result<Vec<Arc<T>>, CoreError> {
    let items = fetch::<T, C>(transport, path).await?;
    Ok(store.replace_all(items))
}

/// Decode a mutation response into the updated item. Accepts the bare
/// item, a `data` envelope, or an envelope keyed by the resource kind.
fn decode_reply<T: Resource>(mut value: Value) -> Option<T> {
    canonical_ids(&mut value);
    if let Ok(item) = serde_json::from_value::<T>(value.clone()) {
        return Some(item);
    }
    ["data", T::KIND]
        .iter()
        .filter_map(|key| value.get(*key))
        .find_map(|inner| serde_json::from_value::<T>(inner.clone()).ok())
}

/// A local patch of a single field.
fn set_field<T>(name: &str, value: Value) -> LocalMutation<T> {
    let mut updates = crate::model::FieldUpdates::new();
    updates.insert(name.to_owned(), value);
    LocalMutation::Patch(updates)
}

/// Require an item to exist, returning it.
fn require<T: Resource>(store: &ResourceStore<T>, id: &ResourceId) -> Result<Arc<T>, CoreError> {
    store.get(id).ok_or_else(|| CoreError::NotFound {
        kind: T::KIND,
        id: id.to_string(),
    })
}
