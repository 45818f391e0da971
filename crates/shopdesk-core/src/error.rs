// ── Core error types ──
//
// User-facing errors from shopdesk-core. Consumers never see raw HTTP
// status handling or JSON parse failures directly; the
// `From<shopdesk_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Synchronization ──────────────────────────────────────────────
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("A change to {id} is already in flight")]
    Busy { id: String },

    /// The remote call failed; the optimistic change was already rolled back.
    #[error("Update of {id} failed: {source}")]
    MutationFailed {
        id: String,
        source: Box<CoreError>,
    },

    /// A poll cycle failed; the store was left untouched.
    #[error("Refresh failed: {source}")]
    RefreshFailed { source: Box<CoreError> },

    #[error("Invalid change to {id}: {reason}")]
    InvalidPatch { id: String, reason: String },

    #[error("{kind} {id} already exists")]
    Conflict { kind: &'static str, id: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Session expired -- log in again")]
    SessionExpired,

    #[error("Request timed out")]
    Timeout,

    #[error("Console is disconnected")]
    ConsoleDisconnected,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Could not decode {kind}: {message}")]
    Decode { kind: &'static str, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The innermost cause, unwrapping `MutationFailed` / `RefreshFailed`.
    pub fn root_cause(&self) -> &CoreError {
        match self {
            Self::MutationFailed { source, .. } | Self::RefreshFailed { source } => {
                source.root_cause()
            }
            other => other,
        }
    }

    /// Wrap a poll-cycle failure, avoiding double wrapping.
    pub(crate) fn refresh_failed(err: CoreError) -> Self {
        match err {
            wrapped @ Self::RefreshFailed { .. } => wrapped,
            other => Self::RefreshFailed {
                source: Box::new(other),
            },
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<shopdesk_api::Error> for CoreError {
    fn from(err: shopdesk_api::Error) -> Self {
        match err {
            shopdesk_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            shopdesk_api::Error::SessionExpired => CoreError::SessionExpired,
            shopdesk_api::Error::MissingToken => CoreError::Config {
                message: "no authentication token configured".into(),
            },
            shopdesk_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            shopdesk_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            shopdesk_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            shopdesk_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            shopdesk_api::Error::Deserialization { message, body: _ } => CoreError::Decode {
                kind: "response",
                message,
            },
        }
    }
}
