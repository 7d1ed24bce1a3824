use std::{panic::AssertUnwindSafe, sync::Arc, time::Duration};

use futures::{
    FutureExt,
    future::{BoxFuture, Shared},
};
use tokio::{sync::Mutex, time::sleep};
use tracing::{debug, error, info, warn};

use crate::{
    config::Config,
    error::AuthError,
    management::TokenStore,
    spotify::auth::TokenExchanger,
    types::{SessionStatus, TokenPair},
};

type RefreshResult = Result<String, AuthError>;
type InflightRefresh = Shared<BoxFuture<'static, RefreshResult>>;

/// Tuning knobs of the token lifecycle.
#[derive(Debug, Clone)]
pub struct ManagerSettings {
    /// Safety margin subtracted from the expiry before a token counts as stale.
    pub skew: Duration,
    /// Automatic retries after a transient refresh failure.
    pub refresh_retries: u32,
    /// Delay before each retry.
    pub retry_backoff: Duration,
    /// Longest a caller waits on a refresh before giving up.
    pub wait_timeout: Duration,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self::for_timeout(Duration::from_secs(60), Duration::from_secs(10))
    }
}

impl ManagerSettings {
    pub fn for_timeout(skew: Duration, http_timeout: Duration) -> Self {
        let retry_backoff = Duration::from_millis(500);
        ManagerSettings {
            skew,
            refresh_retries: 1,
            retry_backoff,
            wait_timeout: http_timeout
                .saturating_mul(2)
                .saturating_add(retry_backoff)
                .saturating_add(Duration::from_secs(1)),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::for_timeout(config.expiry_skew, config.http_timeout)
    }

    fn chrono_skew(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.skew).unwrap_or(chrono::Duration::MAX)
    }
}

/// Hands out access tokens that are valid for at least the configured skew.
///
/// Cheap to clone; clones share the same session. At most one refresh is in
/// flight at any time: the first caller that finds the token stale spawns it,
/// every other caller awaits the same shared result.
#[derive(Clone)]
pub struct TokenLifecycleManager {
    store: Arc<TokenStore>,
    exchanger: Arc<dyn TokenExchanger>,
    settings: ManagerSettings,
    inflight: Arc<Mutex<Option<InflightRefresh>>>,
}

impl TokenLifecycleManager {
    pub fn new(
        store: Arc<TokenStore>,
        exchanger: Arc<dyn TokenExchanger>,
        settings: ManagerSettings,
    ) -> Self {
        TokenLifecycleManager {
            store,
            exchanger,
            settings,
            inflight: Arc::new(Mutex::new(None)),
        }
    }

    pub fn store(&self) -> &Arc<TokenStore> {
        &self.store
    }

    pub fn settings(&self) -> &ManagerSettings {
        &self.settings
    }

    /// Completes the authorization flow with the code handed to the callback.
    ///
    /// Never retried: a rejected code does not fix itself.
    pub async fn complete_login(&self, code: &str) -> Result<(), AuthError> {
        let pair = self.exchanger.exchange_code(code).await?;
        info!(expires_at = %pair.expires_at, "spotify login completed");
        self.store.set(pair).await;
        Ok(())
    }

    /// Returns an access token that is not within `skew` of its expiry.
    pub async fn get_valid_access_token(&self) -> Result<String, AuthError> {
        let skew = self.settings.chrono_skew();

        let Some(current) = self.store.get().await else {
            return Err(AuthError::NotAuthenticated);
        };
        if !current.is_expired(skew) {
            return Ok(current.access_token.clone());
        }

        let refresh = {
            let mut slot = self.inflight.lock().await;
            match slot.as_ref() {
                Some(pending) => pending.clone(),
                None => {
                    // A refresh may have settled between the first read and the lock.
                    let Some(current) = self.store.get().await else {
                        return Err(AuthError::NotAuthenticated);
                    };
                    if !current.is_expired(skew) {
                        return Ok(current.access_token.clone());
                    }

                    let pending = self.spawn_refresh(TokenPair::clone(&current));
                    *slot = Some(pending.clone());
                    pending
                }
            }
        };

        match tokio::time::timeout(self.settings.wait_timeout, refresh).await {
            Ok(result) => result,
            Err(_) => Err(AuthError::TemporaryUnavailable(format!(
                "gave up waiting for token refresh after {:?}",
                self.settings.wait_timeout
            ))),
        }
    }

    /// Marks `access_token` as expired so the next caller refreshes it.
    ///
    /// Used when Spotify rejects a token before its advertised expiry. Does
    /// nothing if the store already holds a different token.
    pub async fn expire_access_token(&self, access_token: &str) -> bool {
        let expired = self.store.expire_if_access_token(access_token).await;
        if expired {
            debug!("access token rejected upstream, marked as expired");
        }
        expired
    }

    /// Drops the session; the user has to log in again.
    pub async fn logout(&self) {
        if self.store.clear().await.is_some() {
            info!("spotify session cleared");
        }
    }

    pub async fn status(&self) -> SessionStatus {
        match self.store.get().await {
            Some(pair) => SessionStatus::Authenticated {
                expires_at: pair.expires_at,
            },
            None => SessionStatus::Unauthenticated,
        }
    }

    // Runs the refresh on its own task so it completes even if every waiter
    // gives up, then frees the slot for the next refresh. The slot is freed
    // even when the exchanger panics.
    fn spawn_refresh(&self, stale: TokenPair) -> InflightRefresh {
        let store = Arc::clone(&self.store);
        let exchanger = Arc::clone(&self.exchanger);
        let inflight = Arc::clone(&self.inflight);
        let settings = self.settings.clone();

        let handle = tokio::spawn(async move {
            let result = AssertUnwindSafe(run_refresh(
                &store,
                exchanger.as_ref(),
                &settings,
                &stale,
            ))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                error!("token refresh panicked");
                Err(AuthError::TemporaryUnavailable(
                    "token refresh panicked".to_string(),
                ))
            });
            inflight.lock().await.take();
            result
        });

        async move {
            handle.await.unwrap_or_else(|e| {
                Err(AuthError::TemporaryUnavailable(format!(
                    "token refresh task failed: {e}"
                )))
            })
        }
        .boxed()
        .shared()
    }
}

async fn run_refresh(
    store: &TokenStore,
    exchanger: &dyn TokenExchanger,
    settings: &ManagerSettings,
    stale: &TokenPair,
) -> RefreshResult {
    let mut attempt = 0;

    loop {
        debug!(attempt, "refreshing spotify access token");

        match exchanger.refresh(&stale.refresh_token).await {
            Ok(pair) => {
                let access_token = pair.access_token.clone();
                let expires_at = pair.expires_at;
                if store
                    .replace_if_refresh_token(&stale.refresh_token, pair)
                    .await
                {
                    info!(expires_at = %expires_at, "spotify access token refreshed");
                    return Ok(access_token);
                }
                info!("session changed during refresh, discarding refreshed token");
                return session_after_race(store).await;
            }
            Err(err) if err.is_terminal() => {
                if store.clear_if_refresh_token(&stale.refresh_token).await {
                    warn!(error = %err, "refresh token rejected, session cleared");
                    return Err(err.into());
                }
                info!(error = %err, "refresh token rejected after session changed");
                return session_after_race(store).await;
            }
            Err(err) if attempt < settings.refresh_retries => {
                attempt += 1;
                warn!(error = %err, attempt, "transient refresh failure, retrying");
                sleep(settings.retry_backoff).await;
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed, keeping stale token");
                return Err(err.into());
            }
        }
    }
}

// Outcome for waiters whose refresh lost against a logout or a new login:
// whatever the session holds now wins.
async fn session_after_race(store: &TokenStore) -> RefreshResult {
    match store.get().await {
        Some(current) => Ok(current.access_token.clone()),
        None => Err(AuthError::NotAuthenticated),
    }
}
