//! Session domain: login handshakes, persisted secrets and expiry handling.

pub mod errors;
pub mod manager;
pub mod ports;
pub mod state_types;
pub mod storage;
pub mod types;

pub use errors::{AuthError, AuthResult, StorageError, ValidationError};
pub use manager::{SessionCollaborators, SessionManager};
pub use ports::{AuthorizationOpener, ExpiryPrompt};
pub use state_types::{SessionState, SessionStateStore};
pub use storage::{EncryptedFileStore, MemorySecretStore, SecretStore};
pub use types::{AccountScope, Credentials, Session, keys};
