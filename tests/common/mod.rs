#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;
use spotgate::{
    config::Config,
    error::{AuthError, RefreshError},
    management::{ManagerSettings, TokenLifecycleManager, TokenStore},
    spotify::auth::TokenExchanger,
    types::TokenPair,
};
use tokio::sync::Mutex;

pub const CLIENT_ID: &str = "client";
pub const CLIENT_SECRET: &str = "secret";
pub const REDIRECT_URI: &str = "http://localhost:8080/spotify/callback";
/// base64("client:secret")
pub const BASIC_AUTH: &str = "Basic Y2xpZW50OnNlY3JldA==";

pub fn pair(access: &str, refresh: &str, expires_in_secs: i64) -> TokenPair {
    TokenPair {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        expires_at: Utc::now() + chrono::Duration::seconds(expires_in_secs),
        token_type: "Bearer".to_string(),
    }
}

pub fn fast_settings() -> ManagerSettings {
    ManagerSettings {
        skew: Duration::from_secs(60),
        refresh_retries: 1,
        retry_backoff: Duration::from_millis(10),
        wait_timeout: Duration::from_secs(5),
    }
}

pub fn test_config(provider_uri: &str) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("SPOTIFY_API_AUTH_CLIENT_ID", CLIENT_ID.to_string()),
        ("SPOTIFY_API_AUTH_CLIENT_SECRET", CLIENT_SECRET.to_string()),
        ("SPOTIFY_API_REDIRECT_URI", REDIRECT_URI.to_string()),
        ("SPOTIFY_API_AUTH_URL", format!("{provider_uri}/authorize")),
        ("SPOTIFY_API_TOKEN_URL", format!("{provider_uri}/api/token")),
        ("SPOTIFY_API_URL", format!("{provider_uri}/v1")),
        ("HTTP_TIMEOUT_SECS", "2".to_string()),
    ]);
    Config::from_lookup(|name| vars.get(name).cloned()).unwrap()
}

/// Scripted outcome of one refresh call.
#[derive(Debug, Clone)]
pub enum Scripted {
    Issue { access: String, refresh: Option<String> },
    Fail(RefreshError),
    Panic,
}

impl Scripted {
    pub fn issue(access: &str) -> Self {
        Scripted::Issue {
            access: access.to_string(),
            refresh: None,
        }
    }

    pub fn rotate(access: &str, refresh: &str) -> Self {
        Scripted::Issue {
            access: access.to_string(),
            refresh: Some(refresh.to_string()),
        }
    }

    pub fn rejected(status: u16) -> Self {
        Scripted::Fail(RefreshError::Rejected {
            status,
            body: r#"{"error":"invalid_grant"}"#.to_string(),
        })
    }

    pub fn unavailable() -> Self {
        Scripted::Fail(RefreshError::Transient {
            status: Some(503),
            detail: "service unavailable".to_string(),
        })
    }
}

/// In-process exchanger that counts calls and replays scripted refreshes.
#[derive(Default)]
pub struct FakeExchanger {
    pub exchange_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub refresh_tokens_seen: Mutex<Vec<String>>,
    script: Mutex<VecDeque<Scripted>>,
    login: Mutex<Option<Result<TokenPair, AuthError>>>,
    delay: Duration,
}

impl FakeExchanger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        FakeExchanger {
            delay,
            ..Self::default()
        }
    }

    pub async fn script(self, outcomes: impl IntoIterator<Item = Scripted>) -> Self {
        self.script.lock().await.extend(outcomes);
        self
    }

    pub async fn on_login(self, result: Result<TokenPair, AuthError>) -> Self {
        *self.login.lock().await = Some(result);
        self
    }

    pub fn refreshes(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn exchanges(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenExchanger for FakeExchanger {
    async fn exchange_code(&self, _code: &str) -> Result<TokenPair, AuthError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        self.login
            .lock()
            .await
            .clone()
            .unwrap_or(Err(AuthError::ExchangeFailed {
                status: 400,
                body: "no login scripted".to_string(),
            }))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, RefreshError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refresh_tokens_seen
            .lock()
            .await
            .push(refresh_token.to_string());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.script.lock().await.pop_front() {
            Some(Scripted::Issue { access, refresh }) => Ok(TokenPair {
                access_token: access,
                refresh_token: refresh.unwrap_or_else(|| refresh_token.to_string()),
                expires_at: Utc::now() + chrono::Duration::seconds(3600),
                token_type: "Bearer".to_string(),
            }),
            Some(Scripted::Fail(err)) => Err(err),
            Some(Scripted::Panic) => panic!("exchanger blew up"),
            None => Err(RefreshError::Transient {
                status: None,
                detail: "script exhausted".to_string(),
            }),
        }
    }
}

pub fn manager(
    exchanger: Arc<FakeExchanger>,
    stored: Option<TokenPair>,
    settings: ManagerSettings,
) -> TokenLifecycleManager {
    let store = match stored {
        Some(pair) => TokenStore::with_pair(pair),
        None => TokenStore::new(),
    };
    TokenLifecycleManager::new(Arc::new(store), exchanger, settings)
}
