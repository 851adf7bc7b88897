//! CLI error types with miette diagnostics.
//!
//! Maps API, snapshot, and config errors into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;
use url::Url;

use gwnly_api::{AuthError, Error as ApiError};
use gwnly_config::ConfigError;
use gwnly_core::SnapshotError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(gwnly::cannot_connect),
        help(
            "Check the server URL and your network connection.\n\
             Cloud regions: https://eu.gwn.cloud, https://us.gwn.cloud\n\
             Self-hosted GWN Manager with a self-signed cert: add --insecure"
        )
    )]
    CannotConnect {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {reason}")]
    #[diagnostic(
        code(gwnly::tls_error),
        help("Use --insecure (-k) to accept the certificate, or set ca_cert in your profile.")
    )]
    Tls { reason: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(gwnly::timeout),
        help("The server did not answer in time; try again or check its status.")
    )]
    Timeout { url: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Invalid credentials for {url}")]
    #[diagnostic(
        code(gwnly::invalid_credentials),
        help(
            "The server rejected the app id / secret.\n\
             Check them under GWN Manager > Open API, then run: gwnly config init"
        )
    )]
    InvalidCredentials {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(gwnly::no_credentials),
        help(
            "Configure credentials with: gwnly config init\n\
             Or set GWN_APP_ID and GWN_APP_SECRET."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("No network found on this account")]
    #[diagnostic(
        code(gwnly::no_network),
        help("Create a network in GWN Manager first, or pass --network explicitly.")
    )]
    NoNetwork,

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(gwnly::not_found),
        help("Run: gwnly {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(gwnly::api_error))]
    Api { status: Option<u16>, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(gwnly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(gwnly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: gwnly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(gwnly::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(gwnly::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CannotConnect { .. } | Self::Tls { .. } => exit_code::CONNECTION,
            Self::InvalidCredentials { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NoNetwork | Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Classify a token exchange failure as bad credentials or an
    /// unreachable server.
    pub fn from_auth(err: AuthError, server: &Url) -> Self {
        let url = server.to_string();
        if err.is_invalid_credentials() {
            return Self::InvalidCredentials {
                url,
                source: Box::new(err),
            };
        }
        if matches!(&err, AuthError::Transport(e) if e.is_timeout()) {
            return Self::Timeout { url };
        }
        Self::CannotConnect {
            url,
            source: Box::new(err),
        }
    }

    /// Map a signed-call failure.
    pub fn from_api(err: ApiError, server: &Url) -> Self {
        match err {
            ApiError::Auth(e) => Self::from_auth(e, server),
            ApiError::Http { status: 401, .. } => Self::InvalidCredentials {
                url: server.to_string(),
                source: Box::new(err),
            },
            ApiError::Http { status, body } => Self::Api {
                status: Some(status),
                message: format!("HTTP {status}: {body}"),
            },
            ApiError::Transport(e) if e.is_timeout() => Self::Timeout {
                url: server.to_string(),
            },
            ApiError::Transport(e) => Self::CannotConnect {
                url: server.to_string(),
                source: Box::new(e),
            },
            ApiError::InvalidUrl(e) => Self::Validation {
                field: "server".into(),
                reason: e.to_string(),
            },
            ApiError::Tls(reason) => Self::Tls { reason },
            ApiError::Deserialization { message, .. } => Self::Api {
                status: None,
                message,
            },
        }
    }

    pub fn from_snapshot(err: SnapshotError, server: &Url) -> Self {
        match err {
            SnapshotError::NoNetwork => Self::NoNetwork,
            SnapshotError::Api(e) => Self::from_api(e, server),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile { profile } => Self::ProfileNotFound {
                name: profile,
                available: String::new(),
            },
            other => Self::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn server() -> Url {
        Url::parse("https://eu.gwn.cloud").unwrap()
    }

    #[test]
    fn rejected_token_is_invalid_credentials() {
        let err = CliError::from_auth(
            AuthError::Rejected {
                status: 400,
                body: "invalid_client".into(),
            },
            &server(),
        );
        assert!(matches!(err, CliError::InvalidCredentials { .. }));
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn server_side_token_failure_is_cannot_connect() {
        let err = CliError::from_auth(
            AuthError::Rejected {
                status: 502,
                body: String::new(),
            },
            &server(),
        );
        assert!(matches!(err, CliError::CannotConnect { .. }));
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn no_network_exit_code() {
        let err = CliError::from_snapshot(SnapshotError::NoNetwork, &server());
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn signed_call_401_is_auth() {
        let err = CliError::from_api(
            ApiError::Http {
                status: 401,
                body: String::new(),
            },
            &server(),
        );
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
