//! Error taxonomy for the token core and the HTTP surface.
//!
//! The token core reports [`AuthError`], which is `Clone` so a single refresh
//! result can be handed to every caller that waited on it. The exchanger
//! reports [`RefreshError`] so the lifecycle manager is forced to decide
//! between a terminal and a transient refresh failure. Handlers return
//! [`ApiError`], which renders itself as an HTTP response.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Route the user is sent to whenever a (re-)login is needed.
pub const LOGIN_ROUTE: &str = "/spotify/login";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No token pair has been stored yet.
    #[error("not authenticated with Spotify, please log in")]
    NotAuthenticated,

    /// The authorization code was rejected or the response was unusable.
    /// `status` is 0 when no HTTP response was received at all.
    #[error("authorization code exchange failed with status {status}: {body}")]
    ExchangeFailed { status: u16, body: String },

    /// The refresh token was revoked or is otherwise invalid.
    #[error("refresh token rejected with status {status}, re-authentication required")]
    ReauthenticationRequired { status: u16, body: String },

    /// Network failure, timeout or provider-side error while refreshing.
    #[error("Spotify is temporarily unavailable: {0}")]
    TemporaryUnavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    /// 400/401 from the token endpoint: the grant itself is gone.
    #[error("refresh rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("refresh failed: {detail}")]
    Transient { status: Option<u16>, detail: String },
}

impl RefreshError {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RefreshError::Rejected { .. })
    }
}

impl From<RefreshError> for AuthError {
    fn from(err: RefreshError) -> Self {
        match err {
            RefreshError::Rejected { status, body } => {
                AuthError::ReauthenticationRequired { status, body }
            }
            transient @ RefreshError::Transient { .. } => {
                AuthError::TemporaryUnavailable(transient.to_string())
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),

    #[error("environment variable {name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("failed to load .env file: {0}")]
    EnvFile(String),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Non-2xx answer from a Spotify resource endpoint, passed through as-is.
    #[error("Spotify responded with status {status}")]
    Upstream { status: u16, body: String },

    #[error("request to Spotify failed: {0}")]
    Transport(String),

    #[error("invalid request: {0}")]
    BadRequest(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth(AuthError::NotAuthenticated) => {
                tracing::debug!("request without an authenticated session");
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": "Spotify not authenticated.", "login": LOGIN_ROUTE })),
                )
                    .into_response()
            }
            ApiError::Auth(AuthError::ReauthenticationRequired { status, .. }) => {
                tracing::debug!(status, "session requires re-authentication");
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "Spotify session expired, please log in again.",
                        "login": LOGIN_ROUTE
                    })),
                )
                    .into_response()
            }
            ApiError::Auth(AuthError::ExchangeFailed { status, body }) => {
                tracing::warn!(status, "authorization code exchange failed");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({
                        "error": "Failed to complete Spotify login, please restart it.",
                        "login": LOGIN_ROUTE,
                        "details": body
                    })),
                )
                    .into_response()
            }
            ApiError::Auth(AuthError::TemporaryUnavailable(detail)) => {
                tracing::warn!(detail = %detail, "token refresh temporarily unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "error": "Spotify is temporarily unavailable, try again later." })),
                )
                    .into_response()
            }
            ApiError::Upstream { status, body } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
            }
            ApiError::Transport(detail) => {
                tracing::error!(detail = %detail, "request to Spotify failed");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": "Request to Spotify failed." })),
                )
                    .into_response()
            }
            ApiError::BadRequest(message) => {
                tracing::debug!(message = %message, "bad request");
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
        }
    }
}
