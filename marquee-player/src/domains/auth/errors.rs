//! Session error types

use thiserror::Error;

use crate::infrastructure::api_error::{ApiError, ErrorKind};

/// Main session error type
#[derive(Debug, Error)]
pub enum AuthError {
    /// The remote side rejected the username or password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The session was rejected mid-flight
    #[error("Session expired")]
    SessionExpired,

    /// `complete_login` was called without a preceding `begin_external_login`
    #[error("No login is awaiting approval")]
    NoPendingApproval,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Network error: {0}")]
    Network(#[source] ApiError),
}

impl From<ApiError> for AuthError {
    fn from(error: ApiError) -> Self {
        match error.kind() {
            ErrorKind::InvalidCredentials => AuthError::InvalidCredentials,
            ErrorKind::SessionExpired => AuthError::SessionExpired,
            ErrorKind::NetworkOrUnknown => AuthError::Network(error),
        }
    }
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials => ErrorKind::InvalidCredentials,
            AuthError::SessionExpired => ErrorKind::SessionExpired,
            _ => ErrorKind::NetworkOrUnknown,
        }
    }

    /// Text suitable for showing next to the login form.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials => {
                "Invalid credentials. Username or password is incorrect.".to_string()
            }
            AuthError::SessionExpired => {
                "Your session has expired. Please log in again.".to_string()
            }
            AuthError::Validation(error) => error.to_string(),
            AuthError::NoPendingApproval => {
                "Start the login in your browser before completing it.".to_string()
            }
            _ => "An unexpected error occurred.".to_string(),
        }
    }
}

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read from storage")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to write to storage")]
    WriteFailed(#[source] std::io::Error),

    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Decryption failed")]
    DecryptionFailed,

    #[error("Key derivation failed")]
    KeyDerivationFailed,

    #[error("Corrupted storage data")]
    CorruptedData,
}

/// Login form validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Username is required")]
    MissingUsername,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },
}

pub type AuthResult<T> = std::result::Result<T, AuthError>;
