//! # API Module
//!
//! HTTP handlers of the gateway. They hold no state of their own: login
//! routes drive the [`TokenLifecycleManager`], resource routes go through the
//! [`SpotifyClient`] and translate Spotify's payloads.
//!
//! ## Endpoints
//!
//! - [`health`] - liveness and version
//! - [`login`] / [`callback`] - Authorization Code flow
//! - [`status`] / [`logout`] - session inspection and invalidation
//! - [`top_tracks`], [`now_playing`], [`followed_artists`] - listening stats
//! - [`play`], [`pause`] - playback control
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use spotgate::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/spotify/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;
mod resources;
mod session;

pub use callback::callback;
pub use health::health;
pub use resources::{followed_artists, now_playing, pause, play, top_tracks};
pub use session::{login, logout, status};

use crate::{management::TokenLifecycleManager, spotify::SpotifyClient};

/// Shared state handed to every handler through an `Extension`.
#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenLifecycleManager,
    pub spotify: SpotifyClient,
    pub authorize_url: String,
}
