use thiserror::Error;

/// Longest response body excerpt kept in an error for diagnostics.
const BODY_EXCERPT_CHARS: usize = 200;

/// Failure of the client-credentials exchange against `/oauth/token`.
///
/// Kept separate from [`Error`] so setup flows can tell rejected
/// credentials apart from an unreachable server.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint answered with a non-2xx status.
    #[error("token request rejected (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    /// DNS, connect, TLS or timeout failure before any response arrived.
    #[error("token endpoint unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    /// 2xx response without an `access_token` field.
    #[error("token response did not contain an access token")]
    MissingToken,

    /// The token response was not valid JSON.
    #[error("invalid token response: {message}")]
    Deserialization { message: String, body: String },
}

impl AuthError {
    /// The server understood the request and refused the app id / secret.
    pub fn is_invalid_credentials(&self) -> bool {
        match self {
            Self::Rejected { status, .. } => (400..500).contains(status),
            Self::MissingToken => true,
            _ => false,
        }
    }

    /// The server could not be reached or failed on its side.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status of the token response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Top-level error type for the `gwnly-api` crate.
///
/// Every signed call returns this; a failed token refresh performed as a
/// precondition surfaces as [`Error::Auth`].
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    // ── Transport ───────────────────────────────────────────────────
    /// Non-2xx response from a signed endpoint.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON (de)serialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status associated with this failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Auth(e) => e.status(),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` when no HTTP response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Auth(AuthError::Transport(_)))
    }

    /// Returns `true` if the failure came from authentication, either the
    /// token exchange itself or a signed call rejected with 401.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::Http { status: 401, .. })
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) | Self::Auth(AuthError::Transport(e)) => e.is_timeout(),
            _ => false,
        }
    }
}

/// Trim a response body to a short, char-boundary-safe excerpt.
pub(crate) fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_caps_length_on_char_boundaries() {
        let body = "é".repeat(500);
        let cut = excerpt(&body);
        assert_eq!(cut.chars().count(), BODY_EXCERPT_CHARS);
    }

    #[test]
    fn rejected_4xx_is_invalid_credentials() {
        let err = AuthError::Rejected {
            status: 401,
            body: "invalid_client".into(),
        };
        assert!(err.is_invalid_credentials());
        assert!(!err.is_unreachable());
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn rejected_5xx_is_unreachable() {
        let err = AuthError::Rejected {
            status: 503,
            body: String::new(),
        };
        assert!(err.is_unreachable());
        assert!(!err.is_invalid_credentials());
    }

    #[test]
    fn http_401_counts_as_auth_failure() {
        let err = Error::Http {
            status: 401,
            body: String::new(),
        };
        assert!(err.is_auth());
        assert_eq!(err.status(), Some(401));
        assert!(!err.is_transport());
    }
}
