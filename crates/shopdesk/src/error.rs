//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use shopdesk_config::ConfigError;
use shopdesk_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const BUSY: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to backend at {url}")]
    #[diagnostic(
        code(shopdesk::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(shopdesk::auth_failed),
        help("Check the email and password, then run: shopdesk login")
    )]
    AuthFailed { message: String },

    #[error("Session expired")]
    #[diagnostic(
        code(shopdesk::session_expired),
        help("The stored token is no longer valid. Run: shopdesk login")
    )]
    SessionExpired,

    #[error("No token configured for profile '{profile}'")]
    #[diagnostic(
        code(shopdesk::no_credentials),
        help(
            "Log in with: shopdesk login\n\
             Or pass --token / set SHOPDESK_TOKEN."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(shopdesk::not_found),
        help("Run: shopdesk {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(code(shopdesk::conflict))]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    #[error("Another change to '{identifier}' is still in progress")]
    #[diagnostic(
        code(shopdesk::busy),
        help("Wait for the pending change to finish and try again.")
    )]
    Busy { identifier: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Backend rejected the change to '{identifier}': {message}")]
    #[diagnostic(
        code(shopdesk::rejected),
        help("The local copy was restored to its previous state.")
    )]
    Rejected { identifier: String, message: String },

    #[error("API error ({code}): {message}")]
    #[diagnostic(code(shopdesk::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(shopdesk::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(shopdesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: shopdesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(shopdesk::no_config),
        help(
            "Create one with: shopdesk config init\n\
             Or pass --base-url and --token.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(shopdesk::config))]
    Config(Box<figment::Error>),

    #[error("Keyring error: {message}")]
    #[diagnostic(
        code(shopdesk::keyring),
        help("Use --plaintext to keep the token in the config file instead.")
    )]
    Keyring { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(shopdesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out")]
    #[diagnostic(
        code(shopdesk::timeout),
        help("Increase timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(shopdesk::render))]
    Render(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::SessionExpired | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Busy { .. } => exit_code::BUSY,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::ConsoleDisconnected => CliError::ConnectionFailed {
                url: "(disconnected)".into(),
                source: "Console was disconnected".into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::SessionExpired => CliError::SessionExpired,

            CoreError::Timeout => CliError::Timeout,

            CoreError::NotFound { kind, id } => CliError::NotFound {
                resource_type: kind.into(),
                identifier: id,
                list_command: list_command(kind),
            },

            CoreError::Conflict { kind, id } => CliError::Conflict {
                resource_type: kind.into(),
                identifier: id,
            },

            CoreError::Busy { id } => CliError::Busy { identifier: id },

            // Session and connectivity failures read the same whether
            // they happened mid-mutation or not.
            CoreError::MutationFailed { id, source } => match *source {
                CoreError::Api { message, .. } => CliError::Rejected {
                    identifier: id,
                    message,
                },
                other => CliError::from(other),
            },

            CoreError::RefreshFailed { source } => CliError::from(*source),

            CoreError::InvalidPatch { id, reason } => CliError::Validation { field: id, reason },

            CoreError::Api { message, status } => CliError::ApiError {
                code: status.map_or_else(|| "unknown".into(), |s| s.to_string()),
                message,
            },

            CoreError::Decode { kind, message } => CliError::ApiError {
                code: "decode".into(),
                message: format!("unexpected {kind} payload: {message}"),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

/// The `list` subcommand for a resource kind.
pub fn list_command(kind: &str) -> String {
    match kind.strip_suffix('y') {
        Some(stem) => format!("{stem}ies list"),
        None => format!("{kind}s list"),
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(see: shopdesk config show)".into(),
            },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Keyring(e) => CliError::Keyring {
                message: e.to_string(),
            },
            ConfigError::Serialization(e) => CliError::Render(e.to_string()),
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
