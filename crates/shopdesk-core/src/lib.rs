//! Resource synchronization engine between `shopdesk-api` and the CLI.
//!
//! This crate keeps client-side copies of the shop backend's collections
//! in step with the server:
//!
//! - **[`ResourceStore<T>`]**: ordered, keyed collection of one resource
//!   kind with rollback-capable mutation primitives. Readers get immutable
//!   snapshots through `tokio::sync::watch`.
//!
//! - **[`OptimisticMutator<T>`]**: applies a change locally, issues the
//!   remote call, then commits (server wins) or rolls back. One mutation per
//!   id at a time; a second one gets [`CoreError::Busy`].
//!
//! - **[`PollingScheduler`]**: periodic refresh with overlap protection,
//!   manual `refresh_now()`, and cancellation via `CancellationToken`.
//!
//! - **[`ChangeNotifier`]**: reports ids that appeared since the previous
//!   poll, without a burst on the first load.
//!
//! - **[`ResourceView<T>`]** and **[`Console`]**: bind the pieces above to
//!   concrete endpoints (orders, customers, banners, categories,
//!   subcategories, coupons, products).
//!
//! - **Domain model** ([`model`]): `Order`, `Customer`, `Banner`, ... with
//!   [`ResourceId`] covering numeric and string identifiers.

pub mod config;
pub mod console;
pub mod error;
pub mod model;
pub mod store;
pub mod stream;
pub mod sync;
pub mod transport;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConsoleConfig, DEFAULT_POLL_INTERVAL, TlsVerification};
pub use console::Console;
pub use error::CoreError;
pub use store::{LocalMutation, MutationOutcome, PendingMutation, ResourceStore, Restore};
pub use stream::{ResourceStream, Snapshot};
pub use sync::{ChangeNotifier, OptimisticMutator, PollingScheduler};
pub use transport::Transport;
pub use view::{
    BannersView, CategoriesView, CouponsView, CustomersView, OrderAlerts, OrderFilter,
    OrdersView, ProductsView, RemoteCall, ResourceView, SubcategoriesView,
};

pub use model::{
    Address, AddressKind, Banner, Category, Coupon, Customer, CustomerStatus, DiscountKind,
    FieldUpdates, Order, OrderStatus, PaymentMethod, Product, Resource, ResourceId, Subcategory,
};

// Consumers name HTTP methods through core without depending on the API crate.
pub use shopdesk_api::Method;
