// ── New-arrival detection ──
//
// Compares each fetched collection against the ids seen so far and
// reports the items that appeared since. Drives "N new orders" alerts.

use std::collections::HashSet;
use std::sync::Arc;

use crate::model::{Resource, ResourceId};

/// Tracks the set of ids already seen across polls.
///
/// The first observation only primes the baseline, so an initial load
/// never shows up as a burst of new items. Once primed, the baseline only
/// grows: an id that disappears and comes back is not reported twice.
#[derive(Debug, Default, Clone)]
pub struct ChangeNotifier {
    seen: Option<HashSet<ResourceId>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items of `current` whose id is not in `previous`.
    ///
    /// An empty `previous` is treated as "no baseline yet" and yields
    /// nothing.
    pub fn diff<T: Resource>(previous: &HashSet<ResourceId>, current: &[Arc<T>]) -> Vec<Arc<T>> {
        if previous.is_empty() {
            return Vec::new();
        }
        current
            .iter()
            .filter(|item| !previous.contains(item.id()))
            .cloned()
            .collect()
    }

    /// Record `current` and return the items not seen before.
    pub fn observe<T: Resource>(&mut self, current: &[Arc<T>]) -> Vec<Arc<T>> {
        let Some(seen) = self.seen.as_mut() else {
            self.seen = Some(current.iter().map(|item| item.id().clone()).collect());
            tracing::debug!(kind = T::KIND, count = current.len(), "notifier baseline primed");
            return Vec::new();
        };

        // `insert` returns true only for ids not yet in the baseline, which
        // also de-duplicates within one fetch.
        let arrivals: Vec<Arc<T>> = current
            .iter()
            .filter(|item| seen.insert(item.id().clone()))
            .cloned()
            .collect();

        if !arrivals.is_empty() {
            tracing::debug!(kind = T::KIND, count = arrivals.len(), "new arrivals");
        }
        arrivals
    }

    /// The ids seen so far; empty before the first observation.
    pub fn baseline(&self) -> HashSet<ResourceId> {
        self.seen.clone().unwrap_or_default()
    }

    pub fn is_primed(&self) -> bool {
        self.seen.is_some()
    }

    /// Forget the baseline; the next observation primes again.
    pub fn reset(&mut self) {
        self.seen = None;
    }
}
