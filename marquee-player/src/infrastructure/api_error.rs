use thiserror::Error;

/// Status code the catalog returns alongside a 401 when the username or
/// password was rejected.
pub const INVALID_CREDENTIALS_STATUS_CODE: i32 = 30;

/// Failure categories the session layer cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidCredentials,
    SessionExpired,
    NetworkOrUnknown,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The remote side rejected the session. The expiry handler has already
    /// been notified by the time this is returned.
    #[error("Session expired")]
    SessionExpired,

    #[error("Request failed with status {status}: {message}")]
    Status {
        status: u16,
        status_code: Option<i32>,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::InvalidCredentials => ErrorKind::InvalidCredentials,
            ApiError::SessionExpired => ErrorKind::SessionExpired,
            _ => ErrorKind::NetworkOrUnknown,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
