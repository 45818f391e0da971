//! Configuration for the shopdesk CLI.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), and
//! translation to `shopdesk_core::ConsoleConfig`. The CLI layers its
//! command-line overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shopdesk_core::{ConsoleConfig, DEFAULT_POLL_INTERVAL, TlsVerification};

const KEYRING_SERVICE: &str = "shopdesk";

/// Overrides the config file location (used by tests and CI).
pub const CONFIG_PATH_ENV: &str = "SHOPDESK_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("no token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Profile name to use when none is given explicitly.
    pub fn active_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Background refresh cadence, e.g. "30s" or "2m".
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_poll_interval() -> String {
    humantime::format_duration(DEFAULT_POLL_INTERVAL).to_string()
}

/// A named backend profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "https://shop.example.com").
    pub base_url: String,

    /// Email used by `shopdesk login` when none is given.
    pub email: Option<String>,

    /// Bearer token (plaintext; prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the bearer token.
    pub token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override poll interval (humantime string).
    pub poll_interval: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `$SHOPDESK_CONFIG`, then platform
/// conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "shopdesk", "shopdesk").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("shopdesk");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Layer defaults < TOML file < `SHOPDESK_` env vars.
///
/// Nested keys use a double underscore: `SHOPDESK_DEFAULTS__TIMEOUT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SHOPDESK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token storage ───────────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token"))
}

/// Resolve a bearer token from the credential chain (no CLI flag step).
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's token_env -> env var lookup
    if let Some(val) = profile
        .token_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
    {
        return Ok(SecretString::from(val));
    }

    // 2. System keyring
    if let Some(secret) = keyring_entry(profile_name)
        .ok()
        .and_then(|entry| entry.get_password().ok())
    {
        return Ok(SecretString::from(secret));
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Save a token to the system keyring.
pub fn store_token(profile_name: &str, token: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token.expose_secret())?;
    Ok(())
}

/// Remove a stored token. A missing entry is not an error.
pub fn clear_token(profile_name: &str) -> Result<(), ConfigError> {
    match keyring_entry(profile_name)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// ── Translation to ConsoleConfig ────────────────────────────────────

/// Build a `ConsoleConfig` from a profile, without a token.
pub fn profile_to_console_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ConsoleConfig, ConfigError> {
    let base_url: url::Url = profile
        .base_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {}", profile.base_url),
        })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let poll = profile
        .poll_interval
        .as_deref()
        .unwrap_or(&defaults.poll_interval);

    let mut config = ConsoleConfig::new(base_url);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.poll_interval = parse_poll_interval(poll)?;
    Ok(config)
}

/// Build a ready-to-use `ConsoleConfig` for a named profile, token
/// included.
pub fn resolve_profile(config: &Config, profile_name: &str) -> Result<ConsoleConfig, ConfigError> {
    let profile = config.profile(profile_name)?;
    let token = resolve_token(profile, profile_name)?;
    Ok(profile_to_console_config(profile, &config.defaults)?.with_token(token))
}

/// Parse a humantime duration ("30s", "2m"); zero is rejected.
pub fn parse_poll_interval(raw: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::Validation {
        field: "poll_interval".into(),
        reason,
    };
    let interval = humantime::parse_duration(raw).map_err(|e| invalid(format!("{raw}: {e}")))?;
    if interval.is_zero() {
        return Err(invalid("must be greater than zero".into()));
    }
    Ok(interval)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_profiles_over_defaults() {
        let (_dir, path) = write_config(
            r#"
            default_profile = "staging"

            [defaults]
            poll_interval = "45s"

            [profiles.staging]
            base_url = "https://staging.shop.example"
            token = "tok-plain"
            timeout = 5
            "#,
        );

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.active_profile_name(), "staging");
        assert_eq!(config.defaults.output, "table");

        let profile = config.profile("staging").unwrap();
        let console = profile_to_console_config(profile, &config.defaults).unwrap();
        assert_eq!(console.base_url.as_str(), "https://staging.shop.example/");
        assert_eq!(console.timeout, Duration::from_secs(5));
        assert_eq!(console.poll_interval, Duration::from_secs(45));
        assert_eq!(console.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert!(config.profiles.is_empty());
        assert_eq!(config.defaults.poll_interval, "30s");
    }

    #[test]
    fn tls_mode_follows_profile() {
        let defaults = Defaults::default();
        let mut profile = Profile {
            base_url: "https://shop.example".into(),
            ca_cert: Some(PathBuf::from("/etc/ssl/shop.pem")),
            ..Profile::default()
        };
        let config = profile_to_console_config(&profile, &defaults).unwrap();
        assert_eq!(
            config.tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/ssl/shop.pem"))
        );

        profile.insecure = Some(true);
        let config = profile_to_console_config(&profile, &defaults).unwrap();
        assert_eq!(config.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn invalid_url_is_a_validation_error() {
        let profile = Profile {
            base_url: "not a url".into(),
            ..Profile::default()
        };
        let err = profile_to_console_config(&profile, &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "base_url"));
    }

    #[test]
    fn poll_interval_rejects_zero_and_garbage() {
        assert_eq!(parse_poll_interval("2m").unwrap(), Duration::from_secs(120));
        assert!(parse_poll_interval("0s").is_err());
        assert!(parse_poll_interval("soon").is_err());
    }

    #[test]
    fn unknown_profile_is_reported() {
        let err = resolve_profile(&Config::default(), "prod").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile { ref name } if name == "prod"));
    }

    #[test]
    fn save_writes_readable_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.profiles.insert(
            "default".into(),
            Profile {
                base_url: "https://shop.example".into(),
                email: Some("admin@shop.example".into()),
                ..Profile::default()
            },
        );
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let profile = loaded.profile("default").unwrap();
        assert_eq!(profile.email.as_deref(), Some("admin@shop.example"));
    }
}
