// gwnly-api: Async Rust client for the Grandstream GWN cloud open API
//
// Every data call is signed (see `signature`) and carries a bearer token
// obtained through the client-credentials exchange in `auth`.

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod lenient;
pub mod models;
pub mod signature;
pub mod transport;

pub use auth::{Credentials, DEFAULT_SERVER_URL, Token, TokenManager};
pub use client::{GwnClient, Method};
pub use error::{AuthError, Error};
pub use models::{NetworkId, RawAccessPoint, RawClient, RawNetwork, result_list};
pub use transport::{TlsMode, TransportConfig};
