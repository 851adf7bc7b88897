//! Config subcommand handlers.

use dialoguer::{Input, Select};
use serde::Serialize;
use tabled::Tabled;

use gwnly_api::DEFAULT_SERVER_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of the config with plaintext secrets replaced.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.app_secret.is_some() {
            profile.app_secret = Some(MASK.into());
        }
    }
    cfg
}

/// Format config for display; expects an already redacted config.
fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "poll_interval = {}", cfg.defaults.poll_interval);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "server_url = \"{}\"", p.server_url);
        let _ = writeln!(out, "app_id = \"{}\"", p.app_id);
        if let Some(ref secret) = p.app_secret {
            let _ = writeln!(out, "app_secret = \"{secret}\"");
        }
        if let Some(ref env) = p.app_secret_env {
            let _ = writeln!(out, "app_secret_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
    }

    out.trim_end().to_owned()
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_secret() -> Result<String, CliError> {
    let secret = rpassword::prompt_password("App secret: ").map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: "app_secret".into(),
            reason: "app secret cannot be empty".into(),
        });
    }
    Ok(secret)
}

/// Offer to store the secret in the system keyring or return it for
/// plaintext config.
///
/// Returns `Some(secret)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_keyring_storage(secret: String, profile_name: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the app secret?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        config::store_app_secret(profile_name, &secret)?;
        eprintln!("   ✓ App secret stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(secret))
    }
}

fn unknown_profile(cfg: &Config, name: &str) -> CliError {
    CliError::ProfileNotFound {
        name: name.into(),
        available: cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", "),
    }
}

// ── Profiles table ──────────────────────────────────────────────────

#[derive(Serialize)]
struct ProfileSummary {
    name: String,
    server_url: String,
    app_id: String,
    default: bool,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Server")]
    server_url: String,
    #[tabled(rename = "App ID")]
    app_id: String,
}

impl From<&ProfileSummary> for ProfileRow {
    fn from(p: &ProfileSummary) -> Self {
        Self {
            marker: if p.default { "*" } else { "" },
            name: p.name.clone(),
            server_url: p.server_url.clone(),
            app_id: p.app_id.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("✨ gwnly configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = config::load_config()?;

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default(config::active_profile_name(global, &cfg))
                .interact_text()
                .map_err(prompt_err)?;

            // 2. Server URL
            let server_url: String = Input::new()
                .with_prompt("Server URL (cloud region or GWN Manager)")
                .default(DEFAULT_SERVER_URL.into())
                .interact_text()
                .map_err(prompt_err)?;
            config::parse_server_url(&server_url)?;

            // 3. App id + secret (GWN Manager > Open API)
            let app_id: String = Input::new()
                .with_prompt("App ID")
                .interact_text()
                .map_err(prompt_err)?;
            if app_id.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "app_id".into(),
                    reason: "app id cannot be empty".into(),
                });
            }
            let secret = prompt_secret()?;
            let app_secret = prompt_keyring_storage(secret, &profile_name)?;

            // 4. Build profile, keep the rest of the file
            let mut profile = Profile::new(server_url.trim(), app_id.trim());
            profile.app_secret = app_secret;
            if let Some(previous) = cfg.profiles.get(&profile_name) {
                profile.ca_cert.clone_from(&previous.ca_cert);
                profile.insecure = previous.insecure;
                profile.app_secret_env.clone_from(&previous.app_secret_env);
            }
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            // 5. Write config
            let path = config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: gwnly auth");

            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config()?);
            let out = output::render_single(global.output, &cfg, format_config, |_| {
                "config".into()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), false);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config()?;
            let active = config::active_profile_name(global, &cfg);
            let profiles: Vec<ProfileSummary> = cfg
                .profiles
                .iter()
                .map(|(name, p)| ProfileSummary {
                    name: name.clone(),
                    server_url: p.server_url.clone(),
                    app_id: p.app_id.clone(),
                    default: *name == active,
                })
                .collect();

            let out = output::render_list(
                global.output,
                &profiles,
                |p| ProfileRow::from(p),
                |p| p.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;
            if !cfg.profiles.contains_key(&name) {
                return Err(unknown_profile(&cfg, &name));
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Default profile set to '{name}'");
            }
            Ok(())
        }

        // ── Set-secret ──────────────────────────────────────────────
        ConfigCommand::SetSecret => {
            let cfg = config::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(unknown_profile(&cfg, &profile_name));
            }
            let secret = prompt_secret()?;
            config::store_app_secret(&profile_name, &secret)?;
            if !global.quiet {
                eprintln!("✓ App secret for '{profile_name}' stored in system keyring");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redaction_masks_plaintext_secrets_only() {
        let mut cfg = Config::default();
        let mut with_secret = Profile::new(DEFAULT_SERVER_URL, "app-1");
        with_secret.app_secret = Some("s3cret".into());
        let mut with_env = Profile::new(DEFAULT_SERVER_URL, "app-2");
        with_env.app_secret_env = Some("GWN_LAB_SECRET".into());
        cfg.profiles.insert("home".into(), with_secret);
        cfg.profiles.insert("lab".into(), with_env);

        let shown = format_config(&redacted(&cfg));
        assert!(!shown.contains("s3cret"));
        assert!(shown.contains("app_secret = \"****\""));
        assert!(shown.contains("app_secret_env = \"GWN_LAB_SECRET\""));
        assert!(shown.contains("[profiles.lab]"));
    }
}
