use crate::{config::Config, spotify::auth::build_authorization_url};

/// Prints the Spotify consent URL for the configured application.
pub fn authorize_url(config: &Config) {
    let url = build_authorization_url(
        &config.auth_url,
        &config.client_id,
        &config.redirect_uri,
        config.scopes.as_slice(),
    );
    println!("{url}");
}
