use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    ParseFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read env file {path}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("missing API key; set MARQUEE_API_KEY or `api.api_key`")]
    MissingApiKey,

    #[error("missing access token; set MARQUEE_ACCESS_TOKEN or `api.access_token`")]
    MissingAccessToken,

    #[error("invalid URL for {key}")]
    InvalidUrl {
        key: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid duration {value:?} for {key}")]
    InvalidDuration { key: &'static str, value: String },

    #[error("invalid number {value:?} for {key}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("favorites page size must be at least 1")]
    InvalidPageSize,

    #[error("unable to determine a data directory; set MARQUEE_DATA_DIR")]
    NoDataDir,
}
