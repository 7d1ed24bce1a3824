use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, Query},
    response::Json,
};
use serde::Deserialize;

use crate::{
    api::AppState,
    error::ApiError,
    spotify::{artists, player, tracks},
    types::{FollowedArtist, Message, NowPlaying, TopTrack},
};

#[derive(Debug, Deserialize)]
pub struct TopTracksParams {
    pub limit: Option<u32>,
    pub time_range: Option<String>,
}

pub async fn top_tracks(
    Query(params): Query<TopTracksParams>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<TopTrack>>, ApiError> {
    let limit = params.limit.unwrap_or(tracks::DEFAULT_TOP_TRACKS_LIMIT);
    if !(1..=50).contains(&limit) {
        return Err(ApiError::BadRequest("limit must be between 1 and 50".to_string()));
    }
    let time_range = params
        .time_range
        .unwrap_or_else(|| tracks::DEFAULT_TIME_RANGE.to_string());

    let top = tracks::get_top_tracks(&state.spotify, limit, &time_range).await?;
    Ok(Json(top))
}

pub async fn now_playing(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<NowPlaying>, ApiError> {
    Ok(Json(tracks::get_now_playing(&state.spotify).await?))
}

pub async fn followed_artists(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<FollowedArtist>>, ApiError> {
    Ok(Json(artists::get_followed_artists(&state.spotify).await?))
}

pub async fn play(
    Path(track_id): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Message>, ApiError> {
    player::play_track(&state.spotify, &track_id).await?;
    Ok(Json(Message::new("Track started playing successfully.")))
}

pub async fn pause(Extension(state): Extension<Arc<AppState>>) -> Result<Json<Message>, ApiError> {
    player::pause(&state.spotify).await?;
    Ok(Json(Message::new("Playback paused successfully.")))
}
