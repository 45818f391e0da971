//! CLI configuration: thin wrapper around `shopdesk_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--base-url, --token, --insecure, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use shopdesk_core::{ConsoleConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use shopdesk_config::{Config, Profile, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Build a `ConsoleConfig` without a token (enough for `login`).
///
/// CLI flag overrides take priority over profile values. Without a
/// profile, `--base-url` is required.
pub fn base_console_config(
    global: &GlobalOpts,
    config: &Config,
    profile_name: &str,
) -> Result<ConsoleConfig, CliError> {
    let mut console = match config.profiles.get(profile_name) {
        Some(profile) => {
            let mut console =
                shopdesk_config::profile_to_console_config(profile, &config.defaults)?;
            if let Some(url) = global.base_url.as_deref() {
                console.base_url = parse_url(url)?;
            }
            console
        }
        None => {
            let Some(url) = global.base_url.as_deref() else {
                return Err(missing_profile(config, profile_name));
            };
            let mut console = ConsoleConfig::new(parse_url(url)?);
            console.timeout = Duration::from_secs(config.defaults.timeout);
            console.poll_interval =
                shopdesk_config::parse_poll_interval(&config.defaults.poll_interval)?;
            if config.defaults.insecure {
                console.tls = TlsVerification::DangerAcceptInvalid;
            }
            console
        }
    };

    if global.insecure {
        console.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        console.timeout = Duration::from_secs(secs);
    }
    Ok(console)
}

/// Build a ready-to-use `ConsoleConfig`, token included.
///
/// Token order: `--token` / `SHOPDESK_TOKEN`, then the profile's
/// credential chain (token_env, keyring, plaintext).
pub fn resolve_console_config(global: &GlobalOpts) -> Result<ConsoleConfig, CliError> {
    let config = load_config()?;
    let profile_name = active_profile_name(global, &config);
    let console = base_console_config(global, &config, &profile_name)?;

    let token = match (&global.token, config.profiles.get(&profile_name)) {
        (Some(token), _) => SecretString::from(token.clone()),
        (None, Some(profile)) => shopdesk_config::resolve_token(profile, &profile_name)?,
        (None, None) => {
            return Err(CliError::NoCredentials {
                profile: profile_name,
            });
        }
    };

    Ok(console.with_token(token))
}

fn parse_url(raw: &str) -> Result<url::Url, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

fn missing_profile(config: &Config, profile_name: &str) -> CliError {
    let path = config_path();
    if !path.exists() {
        return CliError::NoConfig {
            path: path.display().to_string(),
        };
    }
    let mut available: Vec<_> = config.profiles.keys().cloned().collect();
    available.sort();
    CliError::ProfileNotFound {
        name: profile_name.into(),
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}
