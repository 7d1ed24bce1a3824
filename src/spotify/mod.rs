//! # Spotify Integration Module
//!
//! Talks to the two Spotify services the gateway depends on:
//!
//! - the accounts service, for the OAuth2 Authorization Code flow
//!   ([`auth`]: consent URL, code exchange and token refresh)
//! - the Web API, for the re-exposed resources ([`tracks`], [`artists`],
//!   [`player`]), always through a [`SpotifyClient`] that carries a currently
//!   valid bearer token
//!
//! ```text
//! HTTP handlers (api)
//!          ↓
//! SpotifyClient ──► TokenLifecycleManager ──► TokenExchanger
//!          ↓                                        ↓
//!   api.spotify.com                         accounts.spotify.com
//! ```
//!
//! Resource payloads are decoded into the narrow structs in [`crate::types`]
//! and reshaped into the gateway's own response types.

pub mod artists;
pub mod auth;
pub mod player;
pub mod tracks;

mod client;

pub use client::SpotifyClient;
