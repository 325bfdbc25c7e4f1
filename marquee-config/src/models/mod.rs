pub mod sources;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub favorites: FavoritesConfig,
    pub storage: StorageConfig,
    pub metadata: ConfigMetadata,
}

impl ClientConfig {
    pub fn data_dir(&self) -> &Path {
        &self.storage.dir
    }

    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.storage.dir)
    }
}

/// Remote catalog endpoint and the static credentials sent with every request
#[derive(Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub api_key: String,
    /// Read access token sent as the bearer header
    pub access_token: String,
    pub request_timeout: Duration,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Browser page where a request token is approved; the token is appended
    pub approval_url: Url,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoritesConfig {
    pub page_size: usize,
    /// `None` lifts the cap
    pub max_entries: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub dir: PathBuf,
}

/// Where the effective configuration came from
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

/// Non-fatal oddities found while loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    InsecureApiUrl(String),
    UnusedEnvFileKey(String),
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::InsecureApiUrl(url) => {
                write!(f, "API base URL {url} is not using https")
            }
            ConfigWarning::UnusedEnvFileKey(key) => {
                write!(f, "ignoring unknown key {key} in env file")
            }
        }
    }
}
