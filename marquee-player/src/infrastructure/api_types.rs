//! Request and response bodies of the authentication and account endpoints.
//!
//! Catalog payloads (movies, profiles, pages) live in `marquee-model`; these
//! are the small envelopes around them.

use marquee_model::MovieId;
use serde::{Deserialize, Serialize};

/// Short-lived token that is validated or approved before it can be
/// exchanged for a session
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RequestToken {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub expires_at: Option<String>,
    pub request_token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionResponse {
    pub session_id: String,
}

/// Generic `{success, status_code, status_message}` envelope used for
/// acknowledgements and error bodies alike
#[derive(Debug, Default, Deserialize)]
pub(crate) struct StatusResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub status_code: Option<i32>,
    #[serde(default)]
    pub status_message: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct ValidateWithLoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub request_token: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateSessionRequest<'a> {
    pub request_token: &'a str,
}

#[derive(Serialize)]
pub(crate) struct DeleteSessionRequest<'a> {
    pub session_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct FavoriteRequest {
    pub media_type: &'static str,
    pub media_id: MovieId,
    pub favorite: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct RatingRequest {
    pub value: u8,
}
