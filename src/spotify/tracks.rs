use reqwest::{Method, StatusCode};

use crate::{
    error::ApiError,
    spotify::SpotifyClient,
    types::{CurrentlyPlayingResponse, NowPlaying, TopTrack, TopTracksResponse},
};

pub const DEFAULT_TOP_TRACKS_LIMIT: u32 = 10;
pub const DEFAULT_TIME_RANGE: &str = "long_term";

/// Retrieves the user's most played tracks.
///
/// # Arguments
///
/// * `limit` - Number of tracks to return (Spotify accepts 1-50)
/// * `time_range` - `short_term`, `medium_term` or `long_term`
pub async fn get_top_tracks(
    client: &SpotifyClient,
    limit: u32,
    time_range: &str,
) -> Result<Vec<TopTrack>, ApiError> {
    let limit = limit.to_string();
    let res: TopTracksResponse = client
        .get_json("/me/top/tracks", |req| {
            req.query(&[("limit", limit.as_str()), ("time_range", time_range)])
        })
        .await?;

    Ok(res.items.into_iter().map(TopTrack::from).collect())
}

/// Retrieves the track currently playing on the user's account.
///
/// Spotify answers 204 with no body when nothing is playing.
pub async fn get_now_playing(client: &SpotifyClient) -> Result<NowPlaying, ApiError> {
    let res = client
        .send(Method::GET, "/me/player/currently-playing", |req| req)
        .await?;

    if res.status() == StatusCode::NO_CONTENT {
        return Ok(NowPlaying::idle());
    }

    let body = res.text().await?;
    if body.trim().is_empty() {
        return Ok(NowPlaying::idle());
    }

    let current: CurrentlyPlayingResponse =
        serde_json::from_str(&body).map_err(|e| ApiError::Transport(e.to_string()))?;
    Ok(NowPlaying::from(current))
}
