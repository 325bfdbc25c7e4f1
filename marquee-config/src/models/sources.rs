use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::constants::*;
use crate::util::non_empty;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub api: FileApiConfig,
    #[serde(default)]
    pub auth: FileAuthConfig,
    #[serde(default)]
    pub favorites: FileFavoritesConfig,
    #[serde(default)]
    pub storage: FileStorageConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Humantime string, e.g. `"30s"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileAuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileFavoritesConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
    /// `0` disables the cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileStorageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Environment-derived configuration values, kept as raw strings so the
/// loader can report which key was malformed.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub request_timeout: Option<String>,
    pub approval_url: Option<String>,
    pub favorites_page_size: Option<String>,
    pub favorites_max: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_map(values: &HashMap<String, String>) -> Self {
        Self::from_lookup(|key| values.get(key).cloned())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| non_empty(lookup(key));
        Self {
            config_path: get(ENV_CONFIG_PATH).map(PathBuf::from),
            api_url: get(ENV_API_URL),
            api_key: get(ENV_API_KEY),
            access_token: get(ENV_ACCESS_TOKEN),
            request_timeout: get(ENV_REQUEST_TIMEOUT),
            approval_url: get(ENV_APPROVAL_URL),
            favorites_page_size: get(ENV_FAVORITES_PAGE_SIZE),
            favorites_max: get(ENV_FAVORITES_MAX),
            data_dir: get(ENV_DATA_DIR).map(PathBuf::from),
        }
    }

    /// Fill every unset value from `fallback`; values already present win.
    pub fn or(self, fallback: EnvConfig) -> Self {
        Self {
            config_path: self.config_path.or(fallback.config_path),
            api_url: self.api_url.or(fallback.api_url),
            api_key: self.api_key.or(fallback.api_key),
            access_token: self.access_token.or(fallback.access_token),
            request_timeout: self.request_timeout.or(fallback.request_timeout),
            approval_url: self.approval_url.or(fallback.approval_url),
            favorites_page_size: self
                .favorites_page_size
                .or(fallback.favorites_page_size),
            favorites_max: self.favorites_max.or(fallback.favorites_max),
            data_dir: self.data_dir.or(fallback.data_dir),
        }
    }
}
