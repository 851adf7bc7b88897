//! CLI configuration: thin wrapper around `gwnly_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--server, --app-id, etc.).

use secrecy::SecretString;

use gwnly_api::{Credentials, DEFAULT_SERVER_URL, TlsMode, TransportConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use gwnly_config::{
    Config, Profile, config_path, load_config, parse_server_url, poll_interval, save_config,
    store_app_secret,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref()).to_owned()
}

/// Build credentials and TLS settings from the config file, the active
/// profile, and CLI overrides.
///
/// Flags win over profile values. Without a profile, the server defaults to
/// the EU cloud region and both the app id and secret must come from flags
/// or environment.
pub fn resolve_credentials(
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<(Credentials, TransportConfig), CliError> {
    let profile_name = active_profile_name(global, cfg);

    let Some(profile) = cfg.profiles.get(&profile_name) else {
        if global.profile.is_some() {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(cfg),
            });
        }
        return resolve_from_flags(global, &profile_name);
    };

    // 1. Server URL (flag > env > profile)
    let server = global.server.as_deref().unwrap_or(&profile.server_url);
    let base_url = parse_server_url(server)?;

    // 2. App id (flag > env > profile)
    let app_id = global
        .app_id
        .as_deref()
        .unwrap_or(&profile.app_id)
        .trim()
        .to_owned();
    if app_id.is_empty() {
        return Err(CliError::NoCredentials {
            profile: profile_name,
        });
    }

    // 3. Secret (flag > env > profile resolution)
    let secret = match global.app_secret.as_deref().filter(|s| !s.is_empty()) {
        Some(secret) => SecretString::from(secret.to_owned()),
        None => gwnly_config::resolve_app_secret(profile, &profile_name)?,
    };

    // 4. TLS
    let mut transport = gwnly_config::profile_transport(profile);
    if global.insecure {
        transport.tls = TlsMode::DangerAcceptInvalid;
    }

    Ok((Credentials::new(app_id, secret, base_url), transport))
}

/// No profile on disk: everything comes from flags / env vars.
fn resolve_from_flags(
    global: &GlobalOpts,
    profile_name: &str,
) -> Result<(Credentials, TransportConfig), CliError> {
    let base_url = parse_server_url(global.server.as_deref().unwrap_or(DEFAULT_SERVER_URL))?;

    let no_credentials = || CliError::NoCredentials {
        profile: profile_name.to_owned(),
    };
    let app_id = global
        .app_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(no_credentials)?;
    let secret = global
        .app_secret
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(no_credentials)?;

    let transport = TransportConfig {
        tls: if global.insecure {
            TlsMode::DangerAcceptInvalid
        } else {
            TlsMode::System
        },
        ..TransportConfig::default()
    };

    Ok((
        Credentials::new(app_id, SecretString::from(secret.to_owned()), base_url),
        transport,
    ))
}

fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        return "(none)".into();
    }
    cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;
    use secrecy::ExposeSecret;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["gwnly"];
        argv.extend_from_slice(args);
        argv.push("networks");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with_profile() -> Config {
        let mut cfg = Config::default();
        let mut profile = Profile::new("https://us.gwn.cloud", "profile-app");
        profile.app_secret = Some("profile-secret".into());
        cfg.profiles.insert("default".into(), profile);
        cfg
    }

    #[test]
    fn flags_override_profile_values() {
        let g = global(&[
            "--server",
            "https://eu.gwn.cloud",
            "--app-id",
            "flag-app",
            "--app-secret",
            "flag-secret",
            "--insecure",
        ]);
        let (creds, transport) = resolve_credentials(&g, &config_with_profile()).unwrap();
        assert_eq!(creds.app_id, "flag-app");
        assert_eq!(creds.secret.expose_secret(), "flag-secret");
        assert_eq!(creds.base_url.host_str(), Some("eu.gwn.cloud"));
        assert!(matches!(transport.tls, TlsMode::DangerAcceptInvalid));
    }

    #[test]
    fn flags_alone_use_default_server() {
        let g = global(&["--app-id", "a", "--app-secret", "s"]);
        let (creds, transport) = resolve_credentials(&g, &Config::default()).unwrap();
        assert_eq!(creds.base_url.as_str(), "https://eu.gwn.cloud/");
        assert!(matches!(transport.tls, TlsMode::System));
    }

    #[test]
    fn missing_secret_without_profile_is_no_credentials() {
        let g = global(&["--app-id", "a"]);
        let err = resolve_credentials(&g, &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoCredentials { .. }));
    }

    #[test]
    fn explicit_unknown_profile_lists_available() {
        let g = global(&["--profile", "lab"]);
        match resolve_credentials(&g, &config_with_profile()).unwrap_err() {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "lab");
                assert_eq!(available, "default");
            }
            other => panic!("expected ProfileNotFound, got {other:?}"),
        }
    }
}
