use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use crate::types::TokenPair;

/// In-memory holder of zero or one [`TokenPair`].
///
/// Pairs are swapped as whole `Arc`s under the lock, so a reader never sees a
/// half-written pair.
#[derive(Debug, Default)]
pub struct TokenStore {
    pair: RwLock<Option<Arc<TokenPair>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pair(pair: TokenPair) -> Self {
        TokenStore {
            pair: RwLock::new(Some(Arc::new(pair))),
        }
    }

    pub async fn get(&self) -> Option<Arc<TokenPair>> {
        self.pair.read().await.clone()
    }

    pub async fn set(&self, pair: TokenPair) {
        *self.pair.write().await = Some(Arc::new(pair));
    }

    pub async fn clear(&self) -> Option<Arc<TokenPair>> {
        self.pair.write().await.take()
    }

    /// Clears the pair only if it still carries `refresh_token`.
    ///
    /// Returns whether the pair was removed.
    pub async fn clear_if_refresh_token(&self, refresh_token: &str) -> bool {
        let mut guard = self.pair.write().await;
        if guard
            .as_ref()
            .is_some_and(|p| p.refresh_token == refresh_token)
        {
            *guard = None;
            return true;
        }
        false
    }

    /// Swaps in `pair` only if the held pair still carries `refresh_token`.
    ///
    /// A refresh started for a session that was logged out or replaced by a
    /// new login in the meantime must not resurrect the old grant.
    pub async fn replace_if_refresh_token(&self, refresh_token: &str, pair: TokenPair) -> bool {
        let mut guard = self.pair.write().await;
        if guard
            .as_ref()
            .is_some_and(|p| p.refresh_token == refresh_token)
        {
            *guard = Some(Arc::new(pair));
            return true;
        }
        false
    }

    /// Marks the held pair as expired if its access token is `access_token`.
    ///
    /// Returns whether the pair was touched.
    pub async fn expire_if_access_token(&self, access_token: &str) -> bool {
        let mut guard = self.pair.write().await;
        match guard.as_ref() {
            Some(current) if current.access_token == access_token => {
                let expired = TokenPair {
                    expires_at: Utc::now(),
                    ..TokenPair::clone(current)
                };
                *guard = Some(Arc::new(expired));
                true
            }
            _ => false,
        }
    }

    /// True when `now >= pair.expires_at - skew`.
    pub fn is_expired(pair: &TokenPair, skew: Duration) -> bool {
        pair.is_expired(skew)
    }
}
