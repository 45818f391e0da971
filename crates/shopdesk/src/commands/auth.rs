//! `login` / `logout` handlers.

use std::io::BufRead;

use dialoguer::Input;
use secrecy::{ExposeSecret, SecretString};

use shopdesk_core::{Console, CoreError};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn read_password(from_stdin: bool) -> Result<SecretString, CliError> {
    let raw = if from_stdin {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        line.trim_end_matches(['\r', '\n']).to_owned()
    } else {
        rpassword::prompt_password("Password: ").map_err(prompt_err)?
    };
    if raw.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(SecretString::from(raw))
}

// ── Login ───────────────────────────────────────────────────────────

pub async fn login(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config()?;
    let profile_name = config::active_profile_name(global, &cfg);
    let console_config = config::base_console_config(global, &cfg, &profile_name)?;

    let known_email = cfg
        .profiles
        .get(&profile_name)
        .and_then(|p| p.email.clone());
    let email = match args.email.or(known_email) {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(prompt_err)?,
    };
    let password = read_password(args.password_stdin)?;

    let token = Console::login(&console_config, &email, &password).await?;

    let profile = cfg.profiles.entry(profile_name.clone()).or_default();
    if profile.base_url.is_empty() || global.base_url.is_some() {
        profile.base_url = console_config.base_url.to_string();
    }
    profile.email = Some(email.clone());

    let stored_in = if args.plaintext {
        profile.token = Some(token.expose_secret().to_owned());
        None
    } else {
        shopdesk_config::store_token(&profile_name, &token)?;
        profile.token = None;
        Some("system keyring")
    };

    let path = config::save_config(&cfg)?;
    output::notice(
        &format!(
            "✓ Logged in as {email} (profile '{profile_name}', token in {})",
            stored_in.map_or_else(|| path.display().to_string(), str::to_owned)
        ),
        global.quiet,
    );
    Ok(())
}

// ── Logout ──────────────────────────────────────────────────────────

pub async fn logout(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    let result = console.logout().await;

    // The stored token is useless either way; forget it before reporting.
    let mut cfg = config::load_config()?;
    let profile_name = config::active_profile_name(global, &cfg);
    if let Err(e) = shopdesk_config::clear_token(&profile_name) {
        tracing::warn!(error = %e, "could not clear keyring token");
    }
    if let Some(profile) = cfg.profiles.get_mut(&profile_name) {
        if profile.token.take().is_some() {
            config::save_config(&cfg)?;
        }
    }

    match result {
        Ok(()) | Err(CoreError::SessionExpired) => {
            output::notice(&format!("✓ Logged out of '{profile_name}'"), global.quiet);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
