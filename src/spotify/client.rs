use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::{config::Config, error::ApiError, management::TokenLifecycleManager};

/// Authenticated access to the Spotify Web API.
///
/// Every request asks the [`TokenLifecycleManager`] for a valid token first.
/// If Spotify still answers 401, that token is marked expired and the request
/// is sent once more with a refreshed one.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    timeout: Duration,
    tokens: TokenLifecycleManager,
}

impl SpotifyClient {
    pub fn new(
        http: Client,
        api_url: impl Into<String>,
        timeout: Duration,
        tokens: TokenLifecycleManager,
    ) -> Self {
        SpotifyClient {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            timeout,
            tokens,
        }
    }

    pub fn from_config(http: Client, config: &Config, tokens: TokenLifecycleManager) -> Self {
        Self::new(http, &config.api_url, config.http_timeout, tokens)
    }

    pub fn tokens(&self) -> &TokenLifecycleManager {
        &self.tokens
    }

    /// Sends an authenticated request and returns the successful response.
    ///
    /// `build` decorates the bare request (query, body) and may be called twice.
    pub async fn send<F>(&self, method: Method, path: &str, build: F) -> Result<Response, ApiError>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let url = format!("{}{}", self.api_url, path);
        let mut retried = false;

        loop {
            let token = self.tokens.get_valid_access_token().await?;
            let request = self
                .http
                .request(method.clone(), &url)
                .bearer_auth(&token)
                .timeout(self.timeout);

            let res = build(request).send().await?;
            let status = res.status();

            if status == StatusCode::UNAUTHORIZED && !retried {
                retried = true;
                if self.tokens.expire_access_token(&token).await {
                    tracing::debug!(path, "retrying after upstream 401");
                }
                continue;
            }

            if !status.is_success() {
                let body = res.text().await?;
                return Err(ApiError::Upstream {
                    status: status.as_u16(),
                    body,
                });
            }

            return Ok(res);
        }
    }

    /// GETs `path` and decodes the JSON body.
    pub async fn get_json<T, F>(&self, path: &str, build: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let res = self.send(Method::GET, path, build).await?;
        Ok(res.json::<T>().await?)
    }
}
