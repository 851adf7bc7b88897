// Signed request executor
//
// Wraps `reqwest::Client` with token acquisition, per-request signing and
// status classification. Endpoint callers live in `endpoints.rs` as
// inherent methods to keep this module focused on transport mechanics.

use std::fmt;

use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{Credentials, TokenManager};
use crate::error::{Error, excerpt};
use crate::signature::{self, SigningParams};
use crate::transport::{GET_TIMEOUT, POST_TIMEOUT, TransportConfig};

/// Query parameters owned by the signing scheme; callers cannot override them.
const SIGNED_QUERY_KEYS: [&str; 4] = ["access_token", "appID", "timestamp", "signature"];

/// HTTP methods used by the open API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
        })
    }
}

/// Client for the GWN open API.
///
/// Issues one request at a time per call; the only shared mutable state is
/// the token held by the [`TokenManager`].
pub struct GwnClient {
    http: reqwest::Client,
    credentials: Credentials,
    tokens: TokenManager,
}

impl GwnClient {
    /// Create a client from credentials and a transport config.
    pub fn new(credentials: Credentials, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, credentials)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, credentials: Credentials) -> Result<Self, Error> {
        let tokens = TokenManager::new(http.clone(), &credentials)?;
        Ok(Self {
            http,
            credentials,
            tokens,
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.credentials.base_url
    }

    /// Token state, for forcing authentication or restoring a saved token.
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Signed GET.
    pub async fn get(&self, path: &str, extra_query: &[(&str, String)]) -> Result<Value, Error> {
        self.call(Method::Get, path, None, extra_query).await
    }

    /// Signed POST with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        extra_query: &[(&str, String)],
    ) -> Result<Value, Error> {
        let body = serde_json::to_string(body).map_err(|e| Error::Deserialization {
            message: format!("failed to serialize request body: {e}"),
            body: String::new(),
        })?;
        self.call(Method::Post, path, Some(body), extra_query).await
    }

    /// Execute one signed request and return the parsed JSON body.
    ///
    /// `body` is compact JSON text; the same bytes are hashed into the
    /// signature and sent. It is ignored for GET. No retry is attempted.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        extra_query: &[(&str, String)],
    ) -> Result<Value, Error> {
        let token = self.tokens.ensure_token().await?;
        let body = match method {
            Method::Get => None,
            Method::Post => body,
        };

        let timestamp = Utc::now().timestamp_millis();
        let signature = signature::sign(
            &SigningParams {
                access_token: token.expose_secret(),
                app_id: &self.credentials.app_id,
                secret: self.credentials.secret.expose_secret(),
                timestamp,
            },
            body.as_deref(),
        );

        let mut query: Vec<(&str, String)> = vec![
            ("access_token", token.expose_secret().to_owned()),
            ("appID", self.credentials.app_id.clone()),
            ("timestamp", timestamp.to_string()),
            ("signature", signature),
        ];
        query.extend(
            extra_query
                .iter()
                .filter(|(key, _)| !SIGNED_QUERY_KEYS.contains(key))
                .map(|(key, value)| (*key, value.clone())),
        );

        let url = self.credentials.endpoint(path)?;
        debug!("{method} {url}");

        let builder = match method {
            Method::Get => self.http.get(url).timeout(GET_TIMEOUT),
            Method::Post => {
                let builder = self
                    .http
                    .post(url)
                    .timeout(POST_TIMEOUT)
                    .header(CONTENT_TYPE, "application/json");
                match body {
                    Some(body) => builder.body(body),
                    None => builder,
                }
            }
        };

        let resp = builder.query(&query).send().await?;
        self.handle_response(resp).await
    }

    /// Classify the status and parse the JSON body.
    async fn handle_response(&self, resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::UNAUTHORIZED {
                // Force a fresh exchange on the next call; this one still fails.
                self.tokens.invalidate().await;
            }
            return Err(Error::Http {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        let body = resp.text().await?;
        trace!(bytes = body.len(), "response body received");

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", excerpt(&body)),
            body,
        })
    }
}
