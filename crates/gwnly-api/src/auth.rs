// Token lifecycle
//
// The open API uses an OAuth2 client-credentials exchange. The resulting
// bearer token is cached with its expiry and refreshed transparently the
// first time it is needed after it goes stale.

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

use crate::error::{AuthError, excerpt};
use crate::lenient;
use crate::transport::GET_TIMEOUT;

/// Default cloud region.
pub const DEFAULT_SERVER_URL: &str = "https://eu.gwn.cloud";

/// Token endpoint path, relative to the server URL.
pub const TOKEN_PATH: &str = "/oauth/token";

/// Token lifetime assumed when the server omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Application credentials for the GWN open API.
///
/// Immutable for the lifetime of a client.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub app_id: String,
    pub secret: SecretString,
    pub base_url: Url,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, secret: SecretString, base_url: Url) -> Self {
        Self {
            app_id: app_id.into(),
            secret,
            base_url,
        }
    }

    /// Resolve an absolute endpoint URL for `path` (which starts with `/`).
    ///
    /// Plain concatenation rather than `Url::join`, so a server URL with a
    /// path prefix (reverse-proxied GWN Manager) keeps its prefix.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}"))
    }
}

/// A bearer token and the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct Token {
    access_token: SecretString,
    expires_at: DateTime<Utc>,
}

impl Token {
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            expires_at,
        }
    }

    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// A token is stale once `now` reaches its expiry.
    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    access_token: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    expires_in: Option<i64>,
}

/// Owns the cached token; the only writer of token state.
///
/// The mutex is held across a refresh so token and expiry are replaced
/// together and concurrent callers never authenticate twice. If a refresh
/// future is dropped mid-flight the previous state is left untouched.
pub struct TokenManager {
    http: reqwest::Client,
    token_url: Url,
    client_id: String,
    client_secret: SecretString,
    token: Mutex<Option<Token>>,
}

impl TokenManager {
    pub fn new(http: reqwest::Client, credentials: &Credentials) -> Result<Self, url::ParseError> {
        Ok(Self {
            http,
            token_url: credentials.endpoint(TOKEN_PATH)?,
            client_id: credentials.app_id.clone(),
            client_secret: credentials.secret.clone(),
            token: Mutex::new(None),
        })
    }

    /// Return a valid access token, authenticating first if the cached
    /// one is absent or stale.
    pub async fn ensure_token(&self) -> Result<SecretString, AuthError> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            if !token.is_stale_at(Utc::now()) {
                return Ok(token.access_token.clone());
            }
            debug!(expired_at = %token.expires_at, "access token stale, re-authenticating");
        }

        let token = self.request_token().await?;
        let access = token.access_token.clone();
        *guard = Some(token);
        Ok(access)
    }

    /// Force a fresh client-credentials exchange, replacing any cached token.
    pub async fn authenticate(&self) -> Result<(), AuthError> {
        let mut guard = self.token.lock().await;
        let token = self.request_token().await?;
        *guard = Some(token);
        Ok(())
    }

    /// Install a previously obtained token (e.g. one persisted across restarts).
    pub async fn set_token(&self, token: Token) {
        *self.token.lock().await = Some(token);
    }

    /// Drop the cached token so the next call re-authenticates.
    pub async fn invalidate(&self) {
        if self.token.lock().await.take().is_some() {
            debug!("cached access token invalidated");
        }
    }

    /// Expiry of the cached token, if any.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.token.lock().await.as_ref().map(Token::expires_at)
    }

    async fn request_token(&self) -> Result<Token, AuthError> {
        debug!("requesting access token at {}", self.token_url);

        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
            ("grant_type", "client_credentials"),
        ];

        let resp = self
            .http
            .post(self.token_url.clone())
            .form(&form)
            .timeout(GET_TIMEOUT)
            .send()
            .await
            .map_err(AuthError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        let body = resp.text().await.map_err(AuthError::Transport)?;
        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::Deserialization {
                message: format!("{e} (body preview: {:?})", excerpt(&body)),
                body: body.clone(),
            })?;

        let access_token = parsed
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let lifetime_secs = parsed.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
        let lifetime = TimeDelta::try_seconds(lifetime_secs)
            .unwrap_or_else(|| TimeDelta::seconds(DEFAULT_TOKEN_LIFETIME_SECS));
        let now = Utc::now();
        let expires_at = now.checked_add_signed(lifetime).unwrap_or(now);

        info!(expires_in = lifetime_secs, "obtained access token");
        Ok(Token {
            access_token: SecretString::from(access_token),
            expires_at,
        })
    }
}
