//! Marquee client library.
//!
//! `infrastructure` owns the HTTP plumbing: the catalog client, its resource
//! accessors and the session-expiry gate. `domains` holds the session
//! lifecycle (`auth`) and the per-screen state containers (`library`).

pub mod domains;
pub mod infrastructure;

pub use domains::auth::{
    AuthError, AuthResult, AuthorizationOpener, Credentials, ExpiryPrompt, SessionCollaborators,
    SessionManager, SessionState,
};
pub use infrastructure::api_client::ApiClient;
pub use infrastructure::api_error::{ApiError, ApiResult, ErrorKind};
pub use infrastructure::expiry::{ExpiryGate, ExpiryHandler};
