// ── Client-side resource storage ──

mod pending;
mod resource_store;

pub use pending::{LocalMutation, MutationKind, MutationOutcome, PendingMutation, Restore};
pub use resource_store::ResourceStore;
