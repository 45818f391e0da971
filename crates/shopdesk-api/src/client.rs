// Admin REST client
//
// Wraps `reqwest::Client` with base-URL joining, JSON bodies, and
// status/body translation into `Error`. Collections come back as raw
// `serde_json::Value` items; typing them is the caller's concern.

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::routes;
use crate::transport::TransportConfig;

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<Value>,
}

/// HTTP client for the shop admin backend.
///
/// The bearer token (if any) is baked into the underlying `reqwest::Client`
/// at construction time. Cloning is cheap: `reqwest::Client` is an `Arc`.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AdminClient {
    /// Create an authenticated client that sends the given bearer token.
    pub fn new(base_url: Url, token: &SecretString, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client_with_token(token)?;
        Ok(Self { http, base_url })
    }

    /// Create a client without credentials; only useful for [`login`](Self::login).
    pub fn anonymous(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
        })
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a route path onto the base URL, keeping any base path prefix.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        let full = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&full)?)
    }

    // ── Collection / mutation calls ─────────────────────────────────

    /// GET a collection endpoint.
    ///
    /// Accepts either a bare JSON array or an object wrapping the array
    /// in a `data` field.
    pub async fn get_list(&self, path: &str) -> Result<Vec<Value>, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        let body = Self::read_body(resp).await?;

        match body {
            Some(Value::Array(items)) => Ok(items),
            Some(Value::Object(mut obj)) => match obj.remove("data") {
                Some(Value::Array(items)) => Ok(items),
                _ => Err(Error::Deserialization {
                    message: "expected a JSON array of items".into(),
                    body: Value::Object(obj).to_string(),
                }),
            },
            Some(other) => Err(Error::Deserialization {
                message: "expected a JSON array of items".into(),
                body: other.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Send a mutation (`POST`/`PUT`/`PATCH`/`DELETE`) with an optional
    /// JSON body. Returns the parsed response body, if one was sent.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>, Error> {
        let url = self.url(path)?;
        debug!("{} {}", method, url);

        let mut req = self.http.request(method, url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        Self::read_body(resp).await
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Exchange email + password for a bearer token.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginResponse, Error> {
        let url = self.url(routes::LOGIN)?;
        debug!("POST {}", url);

        let payload = serde_json::json!({
            "email": email,
            "password": password.expose_secret(),
        });
        let resp = self.http.post(url).json(&payload).send().await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            let body = resp.text().await?;
            return Err(Error::Authentication {
                message: extract_message(&body).unwrap_or_else(|| "invalid credentials".into()),
            });
        }

        let body = Self::read_body(resp).await?.unwrap_or(Value::Null);
        serde_json::from_value(body.clone()).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: body.to_string(),
        })
    }

    /// Invalidate the current token server-side.
    pub async fn logout(&self) -> Result<(), Error> {
        self.send(Method::POST, routes::LOGOUT, None).await?;
        Ok(())
    }

    // ── Response handling ────────────────────────────────────────────

    /// Check the status and parse the body as JSON.
    ///
    /// An empty body on success yields `None`.
    async fn read_body(resp: reqwest::Response) -> Result<Option<Value>, Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }

        let body = resp.text().await?;

        if !status.is_success() {
            let message = extract_message(&body).unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_owned()
                } else {
                    body.clone()
                }
            });
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })
    }
}

/// Pull a human-readable message out of an error body (`error` or `message`).
fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_owned)
}
