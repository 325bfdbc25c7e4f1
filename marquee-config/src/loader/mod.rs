//! Composition of defaults, TOML file, `.env` file and environment.

pub mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use tracing::{debug, warn};
use url::Url;

use crate::constants::*;
use crate::models::sources::{EnvConfig, FileConfig};
use crate::models::{
    ApiConfig, AuthConfig, ClientConfig, ConfigMetadata, ConfigWarning, FavoritesConfig,
    StorageConfig,
};
use crate::util::{parse_cap, parse_duration};
use error::ConfigLoadError;

#[derive(Debug, Clone, Default)]
pub struct ConfigLoaderOptions {
    /// TOML file; falls back to `MARQUEE_CONFIG`
    pub config_path: Option<PathBuf>,
    /// `.env` file whose values never override the real environment
    pub env_file: Option<PathBuf>,
    /// Replaces the process environment, mostly for tests
    pub environment: Option<EnvConfig>,
}

/// Result of a successful load
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: ClientConfig,
    pub warnings: Vec<ConfigWarning>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let mut warnings = Vec::new();

        let mut env = self
            .options
            .environment
            .clone()
            .unwrap_or_else(EnvConfig::gather);

        if let Some(path) = self.options.env_file.as_deref() {
            env = env.or(read_env_file(path, &mut warnings)?);
        }

        let config_path = self
            .options
            .config_path
            .clone()
            .or_else(|| env.config_path.clone());
        let file = match config_path.as_deref() {
            Some(path) => read_config_file(path)?,
            None => FileConfig::default(),
        };

        let base_url = parse_url(
            ENV_API_URL,
            env.api_url.as_deref().or(file.api.base_url.as_deref()),
            DEFAULT_API_URL,
        )?;
        if base_url.scheme() != "https" {
            warnings.push(ConfigWarning::InsecureApiUrl(base_url.to_string()));
        }

        let api_key = env
            .api_key
            .clone()
            .or(file.api.api_key.clone())
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigLoadError::MissingApiKey)?;
        let access_token = env
            .access_token
            .clone()
            .or(file.api.access_token.clone())
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigLoadError::MissingAccessToken)?;

        let request_timeout = match env
            .request_timeout
            .as_deref()
            .or(file.api.request_timeout.as_deref())
        {
            Some(raw) => parse_duration(raw).ok_or_else(|| ConfigLoadError::InvalidDuration {
                key: ENV_REQUEST_TIMEOUT,
                value: raw.to_string(),
            })?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let mut approval_url = parse_url(
            ENV_APPROVAL_URL,
            env.approval_url
                .as_deref()
                .or(file.auth.approval_url.as_deref()),
            DEFAULT_APPROVAL_URL,
        )?;
        if !approval_url.path().ends_with('/') {
            let path = format!("{}/", approval_url.path());
            approval_url.set_path(&path);
        }

        let favorites = resolve_favorites(&env, &file)?;

        let dir = match env.data_dir.clone().or(file.storage.dir.clone()) {
            Some(dir) => dir,
            None => default_data_dir()?,
        };

        let config = ClientConfig {
            api: ApiConfig {
                base_url,
                api_key,
                access_token,
                request_timeout: non_zero_timeout(request_timeout),
            },
            auth: AuthConfig { approval_url },
            favorites,
            storage: StorageConfig { dir },
            metadata: ConfigMetadata {
                config_path,
                env_file: self.options.env_file.clone(),
            },
        };

        for warning in &warnings {
            warn!("{warning}");
        }
        debug!(?config, "configuration loaded");

        Ok(ConfigLoad { config, warnings })
    }
}

fn read_config_file(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigLoadError::ParseFile {
        path: path.to_path_buf(),
        source,
    })
}

fn read_env_file(
    path: &Path,
    warnings: &mut Vec<ConfigWarning>,
) -> Result<EnvConfig, ConfigLoadError> {
    let to_error = |source| ConfigLoadError::EnvFile {
        path: path.to_path_buf(),
        source,
    };
    let mut values = std::collections::HashMap::new();
    for item in dotenvy::from_path_iter(path).map_err(to_error)? {
        let (key, value) = item.map_err(to_error)?;
        if !MANAGED_KEYS.contains(&key.as_str()) {
            warnings.push(ConfigWarning::UnusedEnvFileKey(key));
            continue;
        }
        values.insert(key, value);
    }
    Ok(EnvConfig::from_map(&values))
}

fn parse_url(
    key: &'static str,
    raw: Option<&str>,
    default: &str,
) -> Result<Url, ConfigLoadError> {
    Url::parse(raw.unwrap_or(default).trim())
        .map_err(|source| ConfigLoadError::InvalidUrl { key, source })
}

fn resolve_favorites(
    env: &EnvConfig,
    file: &FileConfig,
) -> Result<FavoritesConfig, ConfigLoadError> {
    let page_size = match env.favorites_page_size.as_deref() {
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigLoadError::InvalidNumber {
                key: ENV_FAVORITES_PAGE_SIZE,
                value: raw.to_string(),
            })?,
        None => file
            .favorites
            .page_size
            .unwrap_or(DEFAULT_FAVORITES_PAGE_SIZE),
    };
    if page_size == 0 {
        return Err(ConfigLoadError::InvalidPageSize);
    }

    let max_entries = match env.favorites_max.as_deref() {
        Some(raw) => parse_cap(raw).ok_or_else(|| ConfigLoadError::InvalidNumber {
            key: ENV_FAVORITES_MAX,
            value: raw.to_string(),
        })?,
        None => match file.favorites.max_entries {
            Some(0) => None,
            Some(max) => Some(max),
            None => Some(DEFAULT_FAVORITES_MAX),
        },
    };

    Ok(FavoritesConfig {
        page_size,
        max_entries,
    })
}

fn non_zero_timeout(timeout: Duration) -> Duration {
    if timeout.is_zero() {
        DEFAULT_REQUEST_TIMEOUT
    } else {
        timeout
    }
}

fn default_data_dir() -> Result<PathBuf, ConfigLoadError> {
    ProjectDirs::from("", "marquee", "marquee")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(ConfigLoadError::NoDataDir)
}
