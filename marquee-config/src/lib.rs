//! Shared configuration library for Marquee.
//!
//! Configuration is composed from built-in defaults, an optional TOML file, an
//! optional `.env` file and the process environment, in that order of
//! precedence. The loader validates the result once so the client crates can
//! treat a [`ClientConfig`] as trusted.
#![allow(missing_docs)]

pub mod constants;
pub mod loader;
pub mod models;
pub mod util;

pub use loader::{ConfigLoad, ConfigLoader, ConfigLoaderOptions, error::ConfigLoadError};
pub use models::sources::{EnvConfig, FileConfig};
pub use models::{
    ApiConfig, AuthConfig, ClientConfig, ConfigMetadata, ConfigWarning, FavoritesConfig,
    StorageConfig,
};
