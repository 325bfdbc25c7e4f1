use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use marquee_config::ApiConfig;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};

use super::api_error::{ApiError, ApiResult, INVALID_CREDENTIALS_STATUS_CODE};
use super::api_types::StatusResponse;
use super::expiry::ExpiryHandler;

/// Query parameters attached to a single request
pub type Query<'a> = &'a [(&'a str, String)];

/// HTTP client for the catalog API
///
/// Every request carries the `api_key` query parameter and the read access
/// token as a bearer header. A 401 that is not a credentials rejection is
/// reported to the injected [`ExpiryHandler`] exactly once per response.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) client: Client,
    base_url: String,
    api_key: Arc<str>,
    access_token: Arc<str>,
    expiry: Arc<dyn ExpiryHandler>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: &ApiConfig, expiry: Arc<dyn ExpiryHandler>) -> ApiResult<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        let base_url = config.base_url.as_str().trim_end_matches('/').to_string();
        debug!("[ApiClient] Creating API client with base URL: {}", base_url);

        Ok(Self {
            client,
            base_url,
            api_key: Arc::from(config.api_key.as_str()),
            access_token: Arc::from(config.access_token.as_str()),
            expiry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        let path = path.as_ref().trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    /// Start a request with the static credentials attached.
    fn request(&self, method: Method, path: &str, query: Query<'_>) -> RequestBuilder {
        self.client
            .request(method, self.build_url(path))
            .bearer_auth(&*self.access_token)
            .query(&[("api_key", &*self.api_key)])
            .query(query)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: Query<'_>) -> ApiResult<T> {
        debug!("[ApiClient] GET {}", path);
        self.execute(self.request(Method::GET, path, query)).await
    }

    pub async fn post<B, T>(&self, path: &str, query: Query<'_>, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("[ApiClient] POST {}", path);
        self.execute(self.request(Method::POST, path, query).json(body))
            .await
    }

    pub async fn delete<B, T>(&self, path: &str, query: Query<'_>, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("[ApiClient] DELETE {}", path);
        self.execute(self.request(Method::DELETE, path, query).json(body))
            .await
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&body)?);
        }

        let error: StatusResponse = serde_json::from_slice(&body).unwrap_or_default();
        if error.status_code == Some(INVALID_CREDENTIALS_STATUS_CODE) {
            return Err(ApiError::InvalidCredentials);
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!(
                "[ApiClient] Unauthorized response (status_code {:?})",
                error.status_code
            );
            self.expiry.session_expired();
            return Err(ApiError::SessionExpired);
        }

        let message = error
            .status_message
            .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned());
        Err(ApiError::Status {
            status: status.as_u16(),
            status_code: error.status_code,
            message,
        })
    }
}
