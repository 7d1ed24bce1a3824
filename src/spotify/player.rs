use reqwest::Method;

use crate::{error::ApiError, spotify::SpotifyClient, types::PlayRequest};

/// Starts playback of a single track on the user's active device.
pub async fn play_track(client: &SpotifyClient, track_id: &str) -> Result<(), ApiError> {
    let payload = PlayRequest {
        uris: vec![format!("spotify:track:{track_id}")],
    };

    client
        .send(Method::PUT, "/me/player/play", |req| req.json(&payload))
        .await?;
    Ok(())
}

/// Pauses playback on the user's active device.
pub async fn pause(client: &SpotifyClient) -> Result<(), ApiError> {
    client
        .send(Method::PUT, "/me/player/pause", |req| req.body(""))
        .await?;
    Ok(())
}
