// ── Synchronization components ──
//
// The moving parts that keep a `ResourceStore` in step with the backend:
// optimistic mutation, periodic polling, and new-arrival detection.

mod mutator;
mod notifier;
mod scheduler;

pub use mutator::OptimisticMutator;
pub use notifier::ChangeNotifier;
pub use scheduler::PollingScheduler;
