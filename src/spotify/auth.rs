use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode, header};

use crate::{
    config::Config,
    error::{AuthError, RefreshError},
    types::{TokenPair, TokenResponse},
    utils,
};

/// Builds the URL of the Spotify consent screen.
///
/// `client_id` and `redirect_uri` come from trusted configuration and are
/// passed through untouched; only the scope list is encoded, as a single
/// space-joined query value.
///
/// # Example
///
/// ```
/// let url = build_authorization_url(
///     "https://accounts.spotify.com/authorize",
///     "abc",
///     "http://localhost:8080/spotify/callback",
///     &["user-top-read", "streaming"],
/// );
/// // ...&scope=user-top-read%20streaming
/// ```
pub fn build_authorization_url<S: AsRef<str>>(
    auth_url: &str,
    client_id: &str,
    redirect_uri: &str,
    scopes: &[S],
) -> String {
    format!(
        "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&scope={scope}",
        scope = utils::encode_scopes(scopes),
    )
}

/// The two calls against the accounts token endpoint.
///
/// These are the only network operations of the token core. Implementations
/// must bound every call with a timeout and must not retry on their own.
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    /// Trades a one-time authorization code for a fresh token pair.
    async fn exchange_code(&self, code: &str) -> Result<TokenPair, AuthError>;

    /// Mints a new access token. The returned pair keeps `refresh_token`
    /// unless the provider issued a new one.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, RefreshError>;
}

/// [`TokenExchanger`] talking to the real Spotify accounts service.
///
/// Holds one pooled HTTP client for its whole lifetime.
#[derive(Clone)]
pub struct SpotifyTokenExchanger {
    http: Client,
    token_url: String,
    redirect_uri: String,
    authorization: String,
    timeout: Duration,
}

impl SpotifyTokenExchanger {
    pub fn new(
        http: Client,
        token_url: impl Into<String>,
        client_id: &str,
        client_secret: &str,
        redirect_uri: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        SpotifyTokenExchanger {
            http,
            token_url: token_url.into(),
            redirect_uri: redirect_uri.into(),
            authorization: utils::basic_auth_header(client_id, client_secret),
            timeout,
        }
    }

    pub fn from_config(http: Client, config: &Config) -> Self {
        Self::new(
            http,
            &config.token_url,
            &config.client_id,
            &config.client_secret,
            &config.redirect_uri,
            config.http_timeout,
        )
    }

    async fn post_form(&self, form: &[(&str, &str)]) -> Result<(StatusCode, String), reqwest::Error> {
        let res = self
            .http
            .post(&self.token_url)
            .header(header::AUTHORIZATION, &self.authorization)
            .form(form)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        Ok((status, body))
    }
}

#[async_trait]
impl TokenExchanger for SpotifyTokenExchanger {
    async fn exchange_code(&self, code: &str) -> Result<TokenPair, AuthError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];

        let (status, body) = self.post_form(&form).await.map_err(|e| {
            AuthError::ExchangeFailed {
                status: e.status().map_or(0, |s| s.as_u16()),
                body: e.to_string(),
            }
        })?;

        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                body = utils::truncate_body(&body, 200),
                "authorization code rejected"
            );
            return Err(AuthError::ExchangeFailed {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = parse_token_response(&body).map_err(|detail| {
            tracing::warn!(detail = %detail, "malformed code exchange response");
            AuthError::ExchangeFailed {
                status: status.as_u16(),
                body: body.clone(),
            }
        })?;

        let Some(refresh_token) = parsed.refresh_token.clone().filter(|t| !t.is_empty()) else {
            return Err(AuthError::ExchangeFailed {
                status: status.as_u16(),
                body,
            });
        };

        Ok(into_pair(parsed, refresh_token))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, RefreshError> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        let (status, body) = self
            .post_form(&form)
            .await
            .map_err(|e| RefreshError::Transient {
                status: e.status().map(|s| s.as_u16()),
                detail: if e.is_timeout() {
                    format!("token endpoint timed out after {:?}", self.timeout)
                } else {
                    e.to_string()
                },
            })?;

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            return Err(RefreshError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        if !status.is_success() {
            return Err(RefreshError::Transient {
                status: Some(status.as_u16()),
                detail: body,
            });
        }

        let parsed = parse_token_response(&body).map_err(|detail| RefreshError::Transient {
            status: Some(status.as_u16()),
            detail: format!("malformed token response: {detail}"),
        })?;

        let refresh_token = parsed
            .refresh_token
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| refresh_token.to_string());

        Ok(into_pair(parsed, refresh_token))
    }
}

/// Parses and validates a 2xx token endpoint body.
pub fn parse_token_response(body: &str) -> Result<TokenResponse, String> {
    let parsed: TokenResponse = serde_json::from_str(body).map_err(|e| e.to_string())?;

    if parsed.access_token.is_empty() {
        return Err("access_token is empty".to_string());
    }

    if let Some(token_type) = &parsed.token_type {
        if !token_type.eq_ignore_ascii_case("bearer") {
            return Err(format!("unexpected token_type {token_type:?}"));
        }
    }

    Ok(parsed)
}

fn into_pair(parsed: TokenResponse, refresh_token: String) -> TokenPair {
    TokenPair {
        expires_at: utils::expiry_from(Utc::now(), parsed.expires_in),
        token_type: parsed.token_type.unwrap_or_else(|| "Bearer".to_string()),
        access_token: parsed.access_token,
        refresh_token,
    }
}
