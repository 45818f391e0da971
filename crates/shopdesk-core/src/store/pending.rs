// ── Optimistic mutation bookkeeping ──

use std::sync::Arc;

use strum::Display;

use crate::model::{FieldUpdates, ResourceId};

/// A change applied to the local collection ahead of the server.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalMutation<T> {
    /// Set the named fields (wire names) to new values.
    Patch(FieldUpdates),
    /// Swap the whole item, keeping its position.
    Replace(T),
    Remove,
    /// Append a provisional item.
    Insert(T),
}

impl<T> LocalMutation<T> {
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::Patch(_) => MutationKind::Patch,
            Self::Replace(_) => MutationKind::Replace,
            Self::Remove => MutationKind::Remove,
            Self::Insert(_) => MutationKind::Insert,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum MutationKind {
    Patch,
    Replace,
    Remove,
    Insert,
}

/// The state needed to undo a local mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Restore<T> {
    /// Previous field values; `Null` means the field was absent.
    Fields(FieldUpdates),
    /// A whole item and the position it held.
    Item { item: Arc<T>, position: usize },
    /// The id did not exist before.
    Absent,
}

/// An applied, unconfirmed local mutation.
///
/// Created by [`ResourceStore::begin`](super::ResourceStore::begin) and
/// consumed by exactly one of `commit` or `rollback`.
#[derive(Debug)]
#[must_use = "a pending mutation keeps its id busy until committed or rolled back"]
pub struct PendingMutation<T> {
    pub(crate) id: ResourceId,
    pub(crate) kind: MutationKind,
    pub(crate) prior: Restore<T>,
    pub(crate) generation: u64,
}

impl<T> PendingMutation<T> {
    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    pub fn prior(&self) -> &Restore<T> {
        &self.prior
    }

    /// Store generation at the time the mutation was applied.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// How an optimistic mutation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<T> {
    /// The server accepted the change. Carries the server's copy of the
    /// item when it returned one, which now sits in the store.
    Committed(Option<Arc<T>>),
    /// The store was invalidated while the call was pending; the result
    /// was ignored.
    Discarded,
}

impl<T> MutationOutcome<T> {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}
