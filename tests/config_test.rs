use std::{collections::HashMap, time::Duration};

use spotgate::config::{
    Config, DEFAULT_API_URL, DEFAULT_SCOPES, DEFAULT_TOKEN_URL, LogFormat, MAX_HTTP_TIMEOUT_SECS,
    MAX_SKEW_SECS,
};
use spotgate::error::ConfigError;

fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|name| vars.get(name).cloned())
}

const REQUIRED: [(&str, &str); 3] = [
    ("SPOTIFY_API_AUTH_CLIENT_ID", "id"),
    ("SPOTIFY_API_AUTH_CLIENT_SECRET", "secret"),
    ("SPOTIFY_API_REDIRECT_URI", "http://localhost:8080/spotify/callback"),
];

#[test]
fn test_defaults() {
    let config = load(&REQUIRED).unwrap();

    assert_eq!(config.client_id, "id");
    assert_eq!(config.token_url, DEFAULT_TOKEN_URL);
    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert_eq!(config.scopes, DEFAULT_SCOPES.to_vec());
    assert_eq!(config.server_address, "127.0.0.1:8080");
    assert_eq!(config.expiry_skew, Duration::from_secs(60));
    assert_eq!(config.http_timeout, Duration::from_secs(10));
    assert_eq!(config.log_format, LogFormat::Text);
}

#[test]
fn test_missing_required_variable() {
    let err = load(&REQUIRED[..2]).unwrap_err();
    assert_eq!(err, ConfigError::Missing("SPOTIFY_API_REDIRECT_URI"));

    let mut vars = REQUIRED.to_vec();
    vars[0] = ("SPOTIFY_API_AUTH_CLIENT_ID", "  ");
    assert_eq!(
        load(&vars).unwrap_err(),
        ConfigError::Missing("SPOTIFY_API_AUTH_CLIENT_ID")
    );
}

#[test]
fn test_overrides() {
    let mut vars = REQUIRED.to_vec();
    vars.extend([
        ("SPOTIFY_API_AUTH_SCOPE", "user-top-read  streaming"),
        ("SPOTIFY_API_URL", "http://localhost:9000/v1/"),
        ("TOKEN_EXPIRY_SKEW_SECS", "30"),
        ("HTTP_TIMEOUT_SECS", "5"),
        ("LOG_FORMAT", "JSON"),
    ]);
    let config = load(&vars).unwrap();

    assert_eq!(config.scopes, vec!["user-top-read", "streaming"]);
    assert_eq!(config.api_url, "http://localhost:9000/v1");
    assert_eq!(config.expiry_skew, Duration::from_secs(30));
    assert_eq!(config.http_timeout, Duration::from_secs(5));
    assert_eq!(config.log_format, LogFormat::Json);
}

#[test]
fn test_invalid_values() {
    for (name, value) in [
        ("TOKEN_EXPIRY_SKEW_SECS", "0"),
        ("TOKEN_EXPIRY_SKEW_SECS", "soon"),
        ("HTTP_TIMEOUT_SECS", "-1"),
        ("TOKEN_EXPIRY_SKEW_SECS", "3601"),
        ("TOKEN_EXPIRY_SKEW_SECS", "10000000000000"),
        ("HTTP_TIMEOUT_SECS", "301"),
        ("HTTP_TIMEOUT_SECS", "18446744073709551615"),
        ("LOG_FORMAT", "xml"),
    ] {
        let mut vars = REQUIRED.to_vec();
        vars.push((name, value));
        assert!(
            matches!(load(&vars), Err(ConfigError::Invalid { name: n, .. }) if n == name),
            "{name}={value} should be rejected"
        );
    }
}

#[test]
fn test_upper_bounds_are_accepted() {
    let mut vars = REQUIRED.to_vec();
    vars.extend([
        ("TOKEN_EXPIRY_SKEW_SECS", "3600"),
        ("HTTP_TIMEOUT_SECS", "300"),
    ]);
    let config = load(&vars).unwrap();

    assert_eq!(config.expiry_skew, Duration::from_secs(MAX_SKEW_SECS));
    assert_eq!(config.http_timeout, Duration::from_secs(MAX_HTTP_TIMEOUT_SECS));
}

#[test]
fn test_debug_redacts_secret() {
    let config = load(&REQUIRED).unwrap();
    let debug = format!("{config:?}");

    assert!(debug.contains("[REDACTED]"));
    assert!(!debug.contains("\"secret\""));
}
