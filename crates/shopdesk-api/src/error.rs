use thiserror::Error;

/// Top-level error type for the `shopdesk-api` crate.
///
/// Covers every failure mode of the admin REST surface: authentication,
/// transport, backend-reported failures, and payload decoding.
/// `shopdesk-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (wrong credentials, disabled account, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The backend answered 401 on an authenticated call.
    #[error("Session expired -- log in again")]
    SessionExpired,

    /// No bearer token was supplied for a call that needs one.
    #[error("No authentication token configured")]
    MissingToken,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-success status with the backend's `error`/`message` text.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
