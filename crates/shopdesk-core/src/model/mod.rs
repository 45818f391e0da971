// ── Domain model ──

pub mod banner;
pub mod category;
pub mod coupon;
pub mod customer;
pub mod order;
pub mod product;
pub mod resource;
pub mod resource_id;

pub use banner::Banner;
pub use category::{Category, Subcategory};
pub use coupon::{Coupon, DiscountKind};
pub use customer::{Address, AddressKind, Customer, CustomerStatus};
pub use order::{Order, OrderStatus, PaymentMethod};
pub use product::Product;
pub use resource::{FieldUpdates, Resource, decode};
pub(crate) use resource::{canonical_ids, null_as_default};
pub use resource_id::ResourceId;
