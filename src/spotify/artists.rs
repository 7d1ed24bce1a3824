use crate::{
    error::ApiError,
    spotify::SpotifyClient,
    types::{FollowedArtist, FollowedArtistsResponse},
};

/// Retrieves the artists the user follows (first page, as Spotify returns it).
pub async fn get_followed_artists(client: &SpotifyClient) -> Result<Vec<FollowedArtist>, ApiError> {
    let res: FollowedArtistsResponse = client
        .get_json("/me/following", |req| req.query(&[("type", "artist")]))
        .await?;

    Ok(res
        .artists
        .items
        .into_iter()
        .map(FollowedArtist::from)
        .collect())
}
