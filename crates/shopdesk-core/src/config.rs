// ── Runtime console configuration ──
//
// These types describe *how* to reach the admin backend. They carry the
// bearer token and connection tuning, but never touch disk. The CLI
// constructs a `ConsoleConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use shopdesk_api::{TlsMode, TransportConfig};

/// Default cadence for background refresh of polled views.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed staging backends).
    DangerAcceptInvalid,
}

/// Configuration for one admin backend.
///
/// Built by the CLI and passed to [`Console`](crate::Console); core never
/// reads config files or ambient token storage.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Backend base URL (e.g., `https://shop.example.com`).
    pub base_url: Url,
    /// Bearer token. `None` only permits [`Console::login`](crate::Console::login).
    pub token: Option<SecretString>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Background refresh cadence for polled views.
    pub poll_interval: Duration,
}

impl ConsoleConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
