// shopdesk-api: Async Rust client for the shop admin REST backend.

pub mod client;
pub mod error;
pub mod routes;
pub mod transport;

pub use client::{AdminClient, LoginResponse};
pub use error::Error;
pub use reqwest::Method;
pub use transport::{TlsMode, TransportConfig};
