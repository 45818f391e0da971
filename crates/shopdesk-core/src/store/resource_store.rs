// ── Ordered, rollback-capable resource collection ──
//
// Holds the client-side copy of one collection in server order. All
// mutation happens inside a single short critical section so no reader
// ever observes a half-applied change. Readers get immutable snapshots
// through a `watch` channel.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tokio::sync::{broadcast, watch};

use super::pending::{LocalMutation, MutationKind, MutationOutcome, PendingMutation, Restore};
use crate::error::CoreError;
use crate::model::resource::apply_fields;
use crate::model::{FieldUpdates, Resource, ResourceId};
use crate::stream::{ResourceStream, Snapshot};
use crate::sync::ChangeNotifier;

const ARRIVALS_CAPACITY: usize = 16;

struct StoreState<T> {
    items: IndexMap<ResourceId, Arc<T>>,
    /// Ids with an unconfirmed optimistic mutation.
    in_flight: HashSet<ResourceId>,
    /// Bumped by `invalidate()`; pending mutations from an older generation
    /// are ignored when they settle.
    generation: u64,
    notifier: Option<ChangeNotifier>,
}

/// The authoritative client-side copy of one resource collection.
pub struct ResourceStore<T: Resource> {
    state: Mutex<StoreState<T>>,
    snapshot: watch::Sender<Snapshot<T>>,
    version: watch::Sender<u64>,
    arrivals: broadcast::Sender<Vec<Arc<T>>>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl<T: Resource> Default for ResourceStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> ResourceStore<T> {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (version, _) = watch::channel(0u64);
        let (arrivals, _) = broadcast::channel(ARRIVALS_CAPACITY);
        let (last_refresh, _) = watch::channel(None);

        Self {
            state: Mutex::new(StoreState {
                items: IndexMap::new(),
                in_flight: HashSet::new(),
                generation: 0,
                notifier: None,
            }),
            snapshot,
            version,
            arrivals,
            last_refresh,
        }
    }

    /// A store that reports new arrivals on every `replace_all`.
    pub fn with_notifier(notifier: ChangeNotifier) -> Self {
        let store = Self::new();
        store.attach_notifier(notifier);
        store
    }

    // ── Full refresh ─────────────────────────────────────────────────

    /// Replace the collection with a freshly fetched one.
    ///
    /// Items for which [`Resource::is_listed`] is false are dropped. Ids
    /// with an in-flight mutation keep their local value (or their local
    /// absence); in-flight items the server does not know yet stay at the
    /// end in their current order. Subscribers are only notified when the
    /// contents or order actually changed.
    ///
    /// Returns the items the attached notifier considers new (empty when
    /// no notifier is attached).
    pub fn replace_all(&self, items: Vec<T>) -> Vec<Arc<T>> {
        let fetched: Vec<Arc<T>> = items
            .into_iter()
            .filter(T::is_listed)
            .map(Arc::new)
            .collect();

        let mut state = self.lock();
        let mut next: IndexMap<ResourceId, Arc<T>> = IndexMap::with_capacity(fetched.len());

        for item in &fetched {
            let id = item.id();
            if state.in_flight.contains(id) {
                if let Some(local) = state.items.get(id) {
                    next.insert(id.clone(), Arc::clone(local));
                }
                continue;
            }
            // Keep the existing allocation when nothing changed.
            let value = match state.items.get(id) {
                Some(existing) if **existing == **item => Arc::clone(existing),
                _ => Arc::clone(item),
            };
            next.insert(id.clone(), value);
        }

        let pending_only: Vec<(ResourceId, Arc<T>)> = state
            .items
            .iter()
            .filter(|(id, _)| state.in_flight.contains(*id) && !next.contains_key(*id))
            .map(|(id, item)| (id.clone(), Arc::clone(item)))
            .collect();
        next.extend(pending_only);

        let changed = !same_sequence(&state.items, &next);
        if changed {
            state.items = next;
            self.publish(&state);
        }

        let arrivals = state
            .notifier
            .as_mut()
            .map(|n| n.observe(&fetched))
            .unwrap_or_default();
        drop(state);

        tracing::debug!(
            kind = T::KIND,
            count = fetched.len(),
            changed,
            arrivals = arrivals.len(),
            "collection replaced"
        );

        if !arrivals.is_empty() {
            // No receivers is fine.
            let _ = self.arrivals.send(arrivals.clone());
        }
        self.last_refresh.send_replace(Some(Utc::now()));
        arrivals
    }

    // ── Item operations ──────────────────────────────────────────────

    /// Insert an unseen item at the end, or replace an existing one in
    /// place. Returns the previous value.
    pub fn upsert(&self, item: T) -> Option<Arc<T>> {
        let mut state = self.lock();
        let previous = state.items.insert(item.id().clone(), Arc::new(item));
        self.publish(&state);
        previous
    }

    /// Apply a partial update and return the previous values of the
    /// named fields.
    pub fn patch(&self, id: &ResourceId, updates: &FieldUpdates) -> Result<FieldUpdates, CoreError> {
        let mut state = self.lock();
        let previous = patch_locked(&mut state, id, updates)?;
        self.publish(&state);
        Ok(previous)
    }

    /// Remove an item, returning its former position and value.
    pub fn remove(&self, id: &ResourceId) -> Result<(usize, Arc<T>), CoreError> {
        let mut state = self.lock();
        let (position, _, item) = state
            .items
            .shift_remove_full(id)
            .ok_or_else(|| not_found::<T>(id))?;
        self.publish(&state);
        Ok((position, item))
    }

    /// Return an item to a captured prior state, including its position.
    pub fn restore(&self, id: &ResourceId, prior: Restore<T>) -> Result<(), CoreError> {
        let mut state = self.lock();
        restore_locked(&mut state, id, prior)?;
        self.publish(&state);
        Ok(())
    }

    // ── Optimistic mutation lifecycle ────────────────────────────────

    /// Apply `mutation` locally and mark `id` in flight, atomically.
    ///
    /// Fails with [`CoreError::Busy`] when `id` already has a pending
    /// mutation; the store is left untouched in that case.
    pub fn begin(
        &self,
        id: &ResourceId,
        mutation: LocalMutation<T>,
    ) -> Result<PendingMutation<T>, CoreError> {
        let mut state = self.lock();
        if state.in_flight.contains(id) {
            return Err(CoreError::Busy { id: id.to_string() });
        }

        let kind = mutation.kind();
        let prior = match mutation {
            LocalMutation::Patch(updates) => {
                Restore::Fields(patch_locked(&mut state, id, &updates)?)
            }
            LocalMutation::Replace(item) => {
                ensure_same_id(id, &item)?;
                let (position, _, previous) =
                    state.items.get_full(id).ok_or_else(|| not_found::<T>(id))?;
                let previous = Arc::clone(previous);
                state.items.insert(id.clone(), Arc::new(item));
                Restore::Item {
                    item: previous,
                    position,
                }
            }
            LocalMutation::Remove => {
                let (position, _, item) = state
                    .items
                    .shift_remove_full(id)
                    .ok_or_else(|| not_found::<T>(id))?;
                Restore::Item { item, position }
            }
            LocalMutation::Insert(item) => {
                ensure_same_id(id, &item)?;
                if state.items.contains_key(id) {
                    return Err(CoreError::Conflict {
                        kind: T::KIND,
                        id: id.to_string(),
                    });
                }
                state.items.insert(id.clone(), Arc::new(item));
                Restore::Absent
            }
        };

        state.in_flight.insert(id.clone());
        self.publish(&state);

        Ok(PendingMutation {
            id: id.clone(),
            kind,
            prior,
            generation: state.generation,
        })
    }

    /// Confirm a pending mutation. A server-supplied item replaces the
    /// local one (server wins).
    pub fn commit(&self, pending: PendingMutation<T>, server: Option<T>) -> MutationOutcome<T> {
        let mut state = self.lock();
        state.in_flight.remove(&pending.id);
        if pending.generation != state.generation {
            return MutationOutcome::Discarded;
        }

        let Some(item) = server else {
            return MutationOutcome::Committed(None);
        };
        if pending.kind == MutationKind::Remove {
            return MutationOutcome::Committed(None);
        }

        let item = Arc::new(item);
        let server_id = item.id().clone();
        if server_id != pending.id {
            if pending.kind != MutationKind::Insert {
                tracing::warn!(
                    kind = T::KIND,
                    id = %pending.id,
                    server_id = %server_id,
                    "server returned a different item; keeping local value"
                );
                return MutationOutcome::Committed(None);
            }
            // The provisional id is swapped for the server-assigned one.
            match state.items.shift_remove_full(&pending.id) {
                Some((position, _, _)) if !state.items.contains_key(&server_id) => {
                    state
                        .items
                        .shift_insert(position, server_id, Arc::clone(&item));
                }
                _ => {
                    state.items.insert(server_id, Arc::clone(&item));
                }
            }
        } else {
            state.items.insert(server_id, Arc::clone(&item));
        }

        self.publish(&state);
        MutationOutcome::Committed(Some(item))
    }

    /// Undo a pending mutation. Returns `false` when the store was
    /// invalidated in the meantime and nothing was restored.
    pub fn rollback(&self, pending: PendingMutation<T>) -> bool {
        let mut state = self.lock();
        state.in_flight.remove(&pending.id);
        if pending.generation != state.generation {
            return false;
        }

        if let Err(e) = restore_locked(&mut state, &pending.id, pending.prior) {
            tracing::warn!(kind = T::KIND, id = %pending.id, error = %e, "rollback could not restore item");
        }
        self.publish(&state);
        true
    }

    /// Detach every pending mutation from this store: when they settle,
    /// their results are discarded. In-flight marks stay until then.
    pub fn invalidate(&self) {
        let mut state = self.lock();
        state.generation += 1;
        tracing::debug!(kind = T::KIND, generation = state.generation, "store invalidated");
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// The current collection in server order (cheap `Arc` clone).
    pub fn snapshot(&self) -> Snapshot<T> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> ResourceStream<T> {
        ResourceStream::new(self.snapshot.subscribe())
    }

    /// Receive each non-empty batch of new arrivals.
    pub fn new_arrivals(&self) -> broadcast::Receiver<Vec<Arc<T>>> {
        self.arrivals.subscribe()
    }

    pub fn get(&self, id: &ResourceId) -> Option<Arc<T>> {
        self.lock().items.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn is_in_flight(&self, id: &ResourceId) -> bool {
        self.lock().in_flight.contains(id)
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Bumped on every published change.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// Time of the last `replace_all`.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    pub fn attach_notifier(&self, notifier: ChangeNotifier) {
        self.lock().notifier = Some(notifier);
    }

    /// Ids the attached notifier has seen (empty without a notifier).
    pub fn baseline(&self) -> HashSet<ResourceId> {
        self.lock()
            .notifier
            .as_ref()
            .map(ChangeNotifier::baseline)
            .unwrap_or_default()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, StoreState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rebuild the snapshot and bump the version. Called with the lock
    /// held so snapshots are published in mutation order.
    fn publish(&self, state: &StoreState<T>) {
        let values: Vec<Arc<T>> = state.items.values().cloned().collect();
        self.snapshot.send_replace(Arc::new(values));
        self.version.send_modify(|v| *v += 1);
    }
}

fn not_found<T: Resource>(id: &ResourceId) -> CoreError {
    CoreError::NotFound {
        kind: T::KIND,
        id: id.to_string(),
    }
}

fn ensure_same_id<T: Resource>(id: &ResourceId, item: &T) -> Result<(), CoreError> {
    if item.id() == id {
        Ok(())
    } else {
        Err(CoreError::InvalidPatch {
            id: id.to_string(),
            reason: format!("item carries id {}", item.id()),
        })
    }
}

fn patch_locked<T: Resource>(
    state: &mut StoreState<T>,
    id: &ResourceId,
    updates: &FieldUpdates,
) -> Result<FieldUpdates, CoreError> {
    let slot = state.items.get_mut(id).ok_or_else(|| not_found::<T>(id))?;
    let (patched, previous) = apply_fields(&**slot, updates).map_err(|reason| {
        CoreError::InvalidPatch {
            id: id.to_string(),
            reason,
        }
    })?;
    *slot = Arc::new(patched);
    Ok(previous)
}

fn restore_locked<T: Resource>(
    state: &mut StoreState<T>,
    id: &ResourceId,
    prior: Restore<T>,
) -> Result<(), CoreError> {
    match prior {
        Restore::Fields(previous) => {
            patch_locked(state, id, &previous)?;
        }
        Restore::Item { item, position } => {
            let limit = if state.items.contains_key(id) {
                state.items.len().saturating_sub(1)
            } else {
                state.items.len()
            };
            state.items.shift_insert(position.min(limit), id.clone(), item);
        }
        Restore::Absent => {
            state.items.shift_remove(id);
        }
    }
    Ok(())
}

/// Same ids, same order, equal values.
fn same_sequence<T: PartialEq>(
    a: &IndexMap<ResourceId, Arc<T>>,
    b: &IndexMap<ResourceId, Arc<T>>,
) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b.iter())
            .all(|((ka, va), (kb, vb))| ka == kb && (Arc::ptr_eq(va, vb) || **va == **vb))
}
