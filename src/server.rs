use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Extension, Router,
    routing::{get, post, put},
};
use reqwest::Client;
use tower_http::trace::TraceLayer;

use crate::{
    Res,
    api::{self, AppState},
    config::Config,
    management::{ManagerSettings, TokenLifecycleManager, TokenStore},
    spotify::{
        SpotifyClient,
        auth::{SpotifyTokenExchanger, build_authorization_url},
    },
};

/// Wires the token core and the Spotify client from configuration.
///
/// One HTTP client is built here and shared by the token exchanger and the
/// resource client.
pub fn build_state(config: &Config) -> Res<Arc<AppState>> {
    let http = Client::builder()
        .timeout(config.http_timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let exchanger = SpotifyTokenExchanger::from_config(http.clone(), config);
    let tokens = TokenLifecycleManager::new(
        Arc::new(TokenStore::new()),
        Arc::new(exchanger),
        ManagerSettings::from_config(config),
    );
    let spotify = SpotifyClient::from_config(http, config, tokens.clone());

    Ok(Arc::new(AppState {
        tokens,
        spotify,
        authorize_url: build_authorization_url(
            &config.auth_url,
            &config.client_id,
            &config.redirect_uri,
            config.scopes.as_slice(),
        ),
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let spotify = Router::new()
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/status", get(api::status))
        .route("/logout", post(api::logout))
        .route("/top-tracks", get(api::top_tracks))
        .route("/now-playing", get(api::now_playing))
        .route("/followed-artists", get(api::followed_artists))
        .route("/play/{track_id}", put(api::play))
        .route("/pause", put(api::pause));

    Router::new()
        .route("/health", get(api::health))
        .nest("/spotify", spotify)
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

pub async fn start_api_server(state: Arc<AppState>, address: &str) -> Res<()> {
    let addr = SocketAddr::from_str(address)?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "gateway listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
