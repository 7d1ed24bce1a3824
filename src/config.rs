//! Configuration management for the Spotify gateway.
//!
//! Configuration comes from environment variables, optionally seeded from a
//! `.env` file in the local data directory. Values are parsed once into a
//! [`Config`] that the rest of the application receives explicitly.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, fmt, path::PathBuf, time::Duration};

use crate::error::ConfigError;

pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_SKEW_SECS: u64 = 60;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
/// Spotify access tokens live for an hour, a larger skew refreshes on every call.
pub const MAX_SKEW_SECS: u64 = 3600;
pub const MAX_HTTP_TIMEOUT_SECS: u64 = 300;

/// Permissions requested on the consent screen, in request order.
pub const DEFAULT_SCOPES: [&str; 6] = [
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-read-currently-playing",
    "user-follow-read",
    "user-top-read",
    "streaming",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub scopes: Vec<String>,
    pub server_address: String,
    pub expiry_skew: Duration,
    pub http_timeout: Duration,
    pub log_format: LogFormat,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("api_url", &self.api_url)
            .field("scopes", &self.scopes)
            .field("server_address", &self.server_address)
            .field("expiry_skew", &self.expiry_skew)
            .field("http_timeout", &self.http_timeout)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Config::from_env`] but against an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let optional = |name: &'static str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let scopes = match lookup("SPOTIFY_API_AUTH_SCOPE").filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw.split_whitespace().map(str::to_string).collect(),
            None => DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Config {
            client_id: required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            client_secret: required("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
            redirect_uri: required("SPOTIFY_API_REDIRECT_URI")?,
            auth_url: optional("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: optional("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url: optional("SPOTIFY_API_URL", DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            scopes,
            server_address: optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            expiry_skew: parse_secs(
                &lookup,
                "TOKEN_EXPIRY_SKEW_SECS",
                DEFAULT_SKEW_SECS,
                MAX_SKEW_SECS,
            )?,
            http_timeout: parse_secs(
                &lookup,
                "HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
                MAX_HTTP_TIMEOUT_SECS,
            )?,
            log_format: match lookup("LOG_FORMAT").as_deref().map(str::trim) {
                None | Some("") => LogFormat::Text,
                Some(v) if v.eq_ignore_ascii_case("text") => LogFormat::Text,
                Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
                Some(v) => {
                    return Err(ConfigError::Invalid {
                        name: "LOG_FORMAT",
                        value: v.to_string(),
                    });
                }
            },
        })
    }
}

// Zero is rejected: a zero skew lets tokens expire mid-flight and a zero
// timeout would disable the request bound. Values above `max` are rejected too.
fn parse_secs<F>(
    lookup: &F,
    name: &'static str,
    default: u64,
    max: u64,
) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name).filter(|v| !v.trim().is_empty()) else {
        return Ok(Duration::from_secs(default));
    };

    match raw.trim().parse::<u64>() {
        Ok(secs) if (1..=max).contains(&secs) => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid { name, value: raw }),
    }
}

/// Location of the optional `.env` file.
///
/// - Linux: `~/.local/share/spotgate/.env`
/// - macOS: `~/Library/Application Support/spotgate/.env`
/// - Windows: `%LOCALAPPDATA%/spotgate/.env`
pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotgate/.env");
    path
}

/// Loads environment variables from the `.env` file in the local data directory.
///
/// Creates the directory structure if it doesn't exist. A missing file is
/// fine since everything can also be supplied through the real environment.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| ConfigError::EnvFile(e.to_string()))?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| ConfigError::EnvFile(e.to_string()))
}
