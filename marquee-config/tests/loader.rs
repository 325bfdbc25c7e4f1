use std::fs;
use std::time::Duration;

use marquee_config::{
    ConfigLoadError, ConfigLoader, ConfigLoaderOptions, ConfigWarning, EnvConfig,
};
use tempfile::tempdir;

fn env(pairs: &[(&str, &str)]) -> EnvConfig {
    let map = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    EnvConfig::from_map(&map)
}

fn base_env(data_dir: &std::path::Path) -> Vec<(&'static str, String)> {
    vec![
        ("MARQUEE_API_KEY", "key-from-env".to_string()),
        ("MARQUEE_ACCESS_TOKEN", "token-from-env".to_string()),
        ("MARQUEE_DATA_DIR", data_dir.display().to_string()),
    ]
}

fn load(options: ConfigLoaderOptions) -> Result<marquee_config::ConfigLoad, ConfigLoadError> {
    ConfigLoader::with_options(options).load()
}

#[test]
fn defaults_apply_when_only_credentials_are_set() {
    let dir = tempdir().unwrap();
    let pairs = base_env(dir.path());
    let pairs: Vec<_> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();

    let loaded = load(ConfigLoaderOptions {
        environment: Some(env(&pairs)),
        ..Default::default()
    })
    .unwrap();

    let config = loaded.config;
    assert_eq!(config.api.base_url.as_str(), "https://api.themoviedb.org/3");
    assert_eq!(config.api.request_timeout, Duration::from_secs(30));
    assert_eq!(config.favorites.page_size, 5);
    assert_eq!(config.favorites.max_entries, Some(20));
    assert_eq!(
        config.auth.approval_url.as_str(),
        "https://www.themoviedb.org/authenticate/"
    );
    assert_eq!(config.data_dir(), dir.path());
    assert!(loaded.warnings.is_empty());
}

#[test]
fn environment_overrides_file_values() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("marquee.toml");
    fs::write(
        &config_path,
        r#"
[api]
base_url = "https://catalog.example.test/3"
api_key = "key-from-file"
access_token = "token-from-file"
request_timeout = "10s"

[favorites]
page_size = 8
max_entries = 0
"#,
    )
    .unwrap();

    let data_dir = dir.path().display().to_string();
    let loaded = load(ConfigLoaderOptions {
        config_path: Some(config_path.clone()),
        environment: Some(env(&[
            ("MARQUEE_API_KEY", "key-from-env"),
            ("MARQUEE_REQUEST_TIMEOUT", "2s"),
            ("MARQUEE_DATA_DIR", data_dir.as_str()),
        ])),
        ..Default::default()
    })
    .unwrap();

    let config = loaded.config;
    assert_eq!(config.api.api_key, "key-from-env");
    assert_eq!(config.api.access_token, "token-from-file");
    assert_eq!(config.api.base_url.host_str(), Some("catalog.example.test"));
    assert_eq!(config.api.request_timeout, Duration::from_secs(2));
    assert_eq!(config.favorites.page_size, 8);
    assert_eq!(config.favorites.max_entries, None);
    assert_eq!(config.metadata.config_path.as_deref(), Some(config_path.as_path()));
}

#[test]
fn env_file_fills_gaps_without_overriding_environment() {
    let dir = tempdir().unwrap();
    let env_file = dir.path().join(".env");
    fs::write(
        &env_file,
        "MARQUEE_API_KEY=from-dotenv\nMARQUEE_ACCESS_TOKEN=dotenv-token\nMARQUEE_FAVORITES_MAX=off\nUNRELATED=1\n",
    )
    .unwrap();

    let data_dir = dir.path().display().to_string();
    let loaded = load(ConfigLoaderOptions {
        env_file: Some(env_file),
        environment: Some(env(&[
            ("MARQUEE_API_KEY", "from-env"),
            ("MARQUEE_DATA_DIR", data_dir.as_str()),
        ])),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(loaded.config.api.api_key, "from-env");
    assert_eq!(loaded.config.api.access_token, "dotenv-token");
    assert_eq!(loaded.config.favorites.max_entries, None);
    assert_eq!(
        loaded.warnings,
        vec![ConfigWarning::UnusedEnvFileKey("UNRELATED".into())]
    );
}

#[test]
fn missing_credentials_are_reported() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().display().to_string();

    let err = load(ConfigLoaderOptions {
        environment: Some(env(&[("MARQUEE_DATA_DIR", data_dir.as_str())])),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingApiKey));

    let err = load(ConfigLoaderOptions {
        environment: Some(env(&[
            ("MARQUEE_DATA_DIR", data_dir.as_str()),
            ("MARQUEE_API_KEY", "k"),
        ])),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingAccessToken));
}

#[test]
fn malformed_values_name_their_key() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().display().to_string();
    let mut pairs = vec![
        ("MARQUEE_DATA_DIR", data_dir.as_str()),
        ("MARQUEE_API_KEY", "k"),
        ("MARQUEE_ACCESS_TOKEN", "t"),
    ];

    pairs.push(("MARQUEE_REQUEST_TIMEOUT", "whenever"));
    let err = load(ConfigLoaderOptions {
        environment: Some(env(&pairs)),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::InvalidDuration { key: "MARQUEE_REQUEST_TIMEOUT", .. }
    ));

    pairs.pop();
    pairs.push(("MARQUEE_FAVORITES_PAGE_SIZE", "0"));
    let err = load(ConfigLoaderOptions {
        environment: Some(env(&pairs)),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, ConfigLoadError::InvalidPageSize));

    pairs.pop();
    pairs.push(("MARQUEE_API_URL", "not a url"));
    let err = load(ConfigLoaderOptions {
        environment: Some(env(&pairs)),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::InvalidUrl { key: "MARQUEE_API_URL", .. }
    ));
}

#[test]
fn plain_http_base_url_is_a_warning() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().display().to_string();
    let loaded = load(ConfigLoaderOptions {
        environment: Some(env(&[
            ("MARQUEE_DATA_DIR", data_dir.as_str()),
            ("MARQUEE_API_KEY", "k"),
            ("MARQUEE_ACCESS_TOKEN", "t"),
            ("MARQUEE_API_URL", "http://127.0.0.1:9000/3"),
            ("MARQUEE_APPROVAL_URL", "http://127.0.0.1:9000/approve"),
        ])),
        ..Default::default()
    })
    .unwrap();

    assert!(matches!(
        loaded.warnings.as_slice(),
        [ConfigWarning::InsecureApiUrl(_)]
    ));
    assert_eq!(
        loaded.config.auth.approval_url.as_str(),
        "http://127.0.0.1:9000/approve/"
    );
}

#[test]
fn unparsable_file_is_an_error() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("broken.toml");
    fs::write(&config_path, "[api\nbase_url = ").unwrap();
    let err = load(ConfigLoaderOptions {
        config_path: Some(config_path),
        environment: Some(EnvConfig::default()),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, ConfigLoadError::ParseFile { .. }));
}
