use log::debug;
use url::Url;

use crate::infrastructure::api_client::ApiClient;
use crate::infrastructure::api_error::ApiResult;
use crate::infrastructure::api_types::{
    CreateSessionRequest, DeleteSessionRequest, RequestToken, SessionResponse, StatusResponse,
    ValidateWithLoginRequest,
};
use crate::infrastructure::routes::v3;

impl ApiClient {
    /// Obtain a fresh, unvalidated request token.
    pub async fn create_request_token(&self) -> ApiResult<RequestToken> {
        self.get(v3::authentication::TOKEN_NEW, &[]).await
    }

    /// Validate a request token with a username and password.
    ///
    /// Wrong credentials come back as
    /// [`ApiError::InvalidCredentials`](crate::ApiError::InvalidCredentials).
    pub async fn validate_with_login(
        &self,
        username: &str,
        password: &str,
        request_token: &str,
    ) -> ApiResult<RequestToken> {
        let body = ValidateWithLoginRequest {
            username,
            password,
            request_token,
        };
        self.post(v3::authentication::VALIDATE_WITH_LOGIN, &[], &body)
            .await
    }

    /// Exchange a validated or approved request token for a session id.
    pub async fn create_session(&self, request_token: &str) -> ApiResult<String> {
        let response: SessionResponse = self
            .post(
                v3::authentication::SESSION_NEW,
                &[],
                &CreateSessionRequest { request_token },
            )
            .await?;
        Ok(response.session_id)
    }

    /// Revoke a session on the remote side.
    pub async fn delete_session(&self, session_id: &str) -> ApiResult<bool> {
        let response: StatusResponse = self
            .delete(
                v3::authentication::SESSION,
                &[],
                &DeleteSessionRequest { session_id },
            )
            .await?;
        debug!("[ApiClient] Session deleted: {:?}", response.success);
        Ok(response.success.unwrap_or(true))
    }
}

/// Browser page where the user approves `request_token`.
pub fn approval_url(base: &Url, request_token: &str) -> Result<Url, url::ParseError> {
    base.join(request_token)
}
