use std::sync::Arc;

use axum::{
    Extension,
    response::{Json, Redirect},
};
use serde_json::{Value, json};

use crate::{
    api::AppState,
    types::{Message, SessionStatus},
};

/// Sends the browser to the Spotify consent screen.
pub async fn login(Extension(state): Extension<Arc<AppState>>) -> Redirect {
    Redirect::to(&state.authorize_url)
}

/// Forgets the stored token pair.
pub async fn logout(Extension(state): Extension<Arc<AppState>>) -> Json<Message> {
    state.tokens.logout().await;
    Json(Message::new("Logged out of Spotify."))
}

/// Reports whether a session exists. Never touches the network.
pub async fn status(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    match state.tokens.status().await {
        SessionStatus::Authenticated { expires_at } => Json(json!({
            "authenticated": true,
            "expiresAt": expires_at,
        })),
        SessionStatus::Unauthenticated => Json(json!({
            "authenticated": false,
            "expiresAt": null,
        })),
    }
}
