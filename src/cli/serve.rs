use crate::{config::Config, error, info, server, success, warning};

/// Starts the gateway and blocks until it is shut down.
///
/// With `open` the consent screen is launched in the default browser right
/// away, so the session is ready as soon as the user approves.
pub async fn serve(config: Config, address: Option<String>, open: bool) {
    let address = address.unwrap_or_else(|| config.server_address.clone());

    let state = match server::build_state(&config) {
        Ok(state) => state,
        Err(e) => error!("Failed to initialise gateway: {}", e),
    };

    info!("Serving Spotify gateway on http://{}", address);
    info!("Log in via http://{}/spotify/login", address);

    if open && webbrowser::open(&state.authorize_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            state.authorize_url
        )
    }

    if let Err(e) = server::start_api_server(state, &address).await {
        error!("Server stopped with an error: {}", e);
    }
    success!("Gateway shut down.");
}
