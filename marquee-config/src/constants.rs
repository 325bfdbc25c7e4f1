//! Defaults and environment variable names.

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_APPROVAL_URL: &str = "https://www.themoviedb.org/authenticate/";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_FAVORITES_PAGE_SIZE: usize = 5;
pub const DEFAULT_FAVORITES_MAX: usize = 20;

pub const ENV_CONFIG_PATH: &str = "MARQUEE_CONFIG";
pub const ENV_API_URL: &str = "MARQUEE_API_URL";
pub const ENV_API_KEY: &str = "MARQUEE_API_KEY";
pub const ENV_ACCESS_TOKEN: &str = "MARQUEE_ACCESS_TOKEN";
pub const ENV_REQUEST_TIMEOUT: &str = "MARQUEE_REQUEST_TIMEOUT";
pub const ENV_APPROVAL_URL: &str = "MARQUEE_APPROVAL_URL";
pub const ENV_FAVORITES_PAGE_SIZE: &str = "MARQUEE_FAVORITES_PAGE_SIZE";
pub const ENV_FAVORITES_MAX: &str = "MARQUEE_FAVORITES_MAX";
pub const ENV_DATA_DIR: &str = "MARQUEE_DATA_DIR";

/// Every variable the loader reads, used when filtering `.env` contents.
pub const MANAGED_KEYS: &[&str] = &[
    ENV_CONFIG_PATH,
    ENV_API_URL,
    ENV_API_KEY,
    ENV_ACCESS_TOKEN,
    ENV_REQUEST_TIMEOUT,
    ENV_APPROVAL_URL,
    ENV_FAVORITES_PAGE_SIZE,
    ENV_FAVORITES_MAX,
    ENV_DATA_DIR,
];
