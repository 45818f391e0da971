//! Config subcommand handlers.

use dialoguer::{Input, Select};
use secrecy::SecretString;
use serde_json::Value;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "poll_interval = \"{}\"", cfg.defaults.poll_interval);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "base_url = \"{}\"", p.base_url);
        if let Some(ref email) = p.email {
            let _ = writeln!(out, "email = \"{email}\"");
        }
        if p.token.is_some() {
            let _ = writeln!(out, "token = \"{MASK}\"");
        }
        if let Some(ref env) = p.token_env {
            let _ = writeln!(out, "token_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(ref poll) = p.poll_interval {
            let _ = writeln!(out, "poll_interval = \"{poll}\"");
        }
    }

    out.trim_end().to_owned()
}

/// Structured form of the config with plaintext tokens masked.
fn redacted_value(cfg: &Config) -> Result<Value, CliError> {
    let mut value = serde_json::to_value(cfg).map_err(|e| CliError::Render(e.to_string()))?;
    if let Some(profiles) = value.get_mut("profiles").and_then(Value::as_object_mut) {
        for profile in profiles.values_mut() {
            if let Some(token) = profile.get_mut("token").filter(|t| !t.is_null()) {
                *token = Value::String(MASK.into());
            }
        }
    }
    Ok(value)
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_token() -> Result<SecretString, CliError> {
    let token = rpassword::prompt_password("Token: ").map_err(prompt_err)?;
    if token.is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "token cannot be empty".into(),
        });
    }
    Ok(SecretString::from(token))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("shopdesk configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let base_url: String = Input::new()
                .with_prompt("Backend URL")
                .default("http://localhost:5000".into())
                .validate_with(|input: &String| {
                    url::Url::parse(input).map(|_| ()).map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let email: String = Input::new()
                .with_prompt("Admin email (optional)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let poll_interval: String = Input::new()
                .with_prompt("Refresh interval")
                .default("30s".into())
                .validate_with(|input: &String| {
                    shopdesk_config::parse_poll_interval(input)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let choices = &[
                "Log in later with `shopdesk login` (recommended)",
                "Paste an existing token into the system keyring",
            ];
            let selection = Select::new()
                .with_prompt("Authentication")
                .items(choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;
            if selection == 1 {
                let token = prompt_token()?;
                shopdesk_config::store_token(&profile_name, &token)?;
                eprintln!("   ✓ Token stored in system keyring");
            }

            let mut cfg = config::load_config()?;
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    base_url,
                    email: (!email.is_empty()).then_some(email),
                    poll_interval: Some(poll_interval),
                    ..Profile::default()
                },
            );
            cfg.default_profile = Some(profile_name.clone());

            let path = config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("  Active profile: {profile_name}");
            if selection == 0 {
                eprintln!("\n  Next: shopdesk login");
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let value = redacted_value(&cfg)?;
            let out = output::render_single(
                &global.output,
                &value,
                |_| format_config_redacted(&cfg),
                |_| config::active_profile_name(global, &cfg),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set-token ───────────────────────────────────────────────
        ConfigCommand::SetToken { token } => {
            let cfg = config::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);
            let token = match token {
                Some(t) if !t.is_empty() => SecretString::from(t),
                Some(_) => {
                    return Err(CliError::Validation {
                        field: "token".into(),
                        reason: "token cannot be empty".into(),
                    });
                }
                None => prompt_token()?,
            };
            shopdesk_config::store_token(&profile_name, &token)?;
            output::notice(
                &format!("✓ Token stored in system keyring for profile '{profile_name}'"),
                global.quiet,
            );
            Ok(())
        }
    }
}
