// ── Core error types ──
//
// A snapshot cycle either produces a complete snapshot or one of these.
// Transport-layer detail stays inside the wrapped `gwnly_api::Error`.

use thiserror::Error;

/// Failure of a snapshot cycle.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The account has no network to scope AP and client queries to.
    #[error("no network configured for this account")]
    NoNetwork,

    /// A signed call failed (including the token refresh that precedes it).
    #[error(transparent)]
    Api(#[from] gwnly_api::Error),
}

impl SnapshotError {
    /// The underlying API error, if any.
    pub fn api(&self) -> Option<&gwnly_api::Error> {
        match self {
            Self::Api(e) => Some(e),
            Self::NoNetwork => None,
        }
    }

    /// Returns `true` when the failure is an authentication problem.
    pub fn is_auth(&self) -> bool {
        self.api().is_some_and(gwnly_api::Error::is_auth)
    }
}

impl From<gwnly_api::AuthError> for SnapshotError {
    fn from(err: gwnly_api::AuthError) -> Self {
        Self::Api(err.into())
    }
}
