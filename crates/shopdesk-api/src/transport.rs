// Shared transport configuration for building reqwest::Client instances.
//
// TLS, timeout, and bearer-token settings live here so the admin client
// never reaches into ambient state for credentials.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

const USER_AGENT: &str = concat!("shopdesk/", env!("CARGO_PKG_VERSION"));

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (staging backends with self-signed certs).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` without credentials (login flow).
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        self.build(HeaderMap::new())
    }

    /// Build a `reqwest::Client` that sends `Authorization: Bearer <token>`
    /// on every request.
    pub fn build_client_with_token(&self, token: &SecretString) -> Result<reqwest::Client, Error> {
        let raw = token.expose_secret();
        if raw.is_empty() {
            return Err(Error::MissingToken);
        }
        let mut value = HeaderValue::from_str(&format!("Bearer {raw}"))
            .map_err(|e| Error::Tls(format!("invalid token header: {e}")))?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        self.build(headers)
    }

    fn build(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_rejected() {
        let cfg = TransportConfig::default();
        let err = cfg
            .build_client_with_token(&SecretString::from(String::new()))
            .err();
        assert!(matches!(err, Some(Error::MissingToken)));
    }

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let cfg = TransportConfig {
            tls: TlsMode::CustomCa("/nonexistent/ca.pem".into()),
            ..TransportConfig::default()
        };
        assert!(matches!(cfg.build_client(), Err(Error::Tls(_))));
    }
}
