use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The access/refresh token pair of the authenticated session.
///
/// Replaced as a whole on every login and refresh, never mutated field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub token_type: String,
}

impl TokenPair {
    /// True when `now >= expires_at - skew`. A skew reaching past the
    /// representable range counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>, skew: Duration) -> bool {
        self.expires_at
            .checked_sub_signed(skew)
            .is_none_or(|stale_at| now >= stale_at)
    }

    pub fn is_expired(&self, skew: Duration) -> bool {
        self.is_expired_at(Utc::now(), skew)
    }
}

/// Body of a successful answer from the accounts token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: u64,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

/// Snapshot of the session used by the status route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Unauthenticated,
    Authenticated { expires_at: DateTime<Utc> },
}

// Spotify Web API payloads. Only the fields the gateway re-exposes are kept,
// everything else in the provider's schema is ignored.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Image {
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimpleArtist {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimpleAlbum {
    pub name: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    pub album: Option<SimpleAlbum>,
    pub preview_url: Option<String>,
    pub duration_ms: Option<u64>,
    pub external_urls: Option<ExternalUrls>,
}

impl Track {
    pub fn artist_names(&self) -> Vec<String> {
        self.artists.iter().filter_map(|a| a.name.clone()).collect()
    }

    pub fn album_name(&self) -> Option<String> {
        self.album.as_ref().and_then(|a| a.name.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopTracksResponse {
    #[serde(default)]
    pub items: Vec<Track>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlayingResponse {
    pub item: Option<Track>,
    pub progress_ms: Option<u64>,
    #[serde(default)]
    pub is_playing: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub external_urls: Option<ExternalUrls>,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FollowedArtistsResponse {
    pub artists: ArtistsContainer,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistsContainer {
    #[serde(default)]
    pub items: Vec<Artist>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayRequest {
    pub uris: Vec<String>,
}

// Shapes returned by the gateway routes.

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopTrack {
    pub name: Option<String>,
    pub id: Option<String>,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub preview_url: Option<String>,
}

impl From<Track> for TopTrack {
    fn from(track: Track) -> Self {
        TopTrack {
            artists: track.artist_names(),
            album: track.album_name(),
            name: track.name,
            id: track.id,
            preview_url: track.preview_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlayingTrack {
    pub name: Option<String>,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub album_image: Option<String>,
    pub progress_ms: Option<u64>,
    pub duration_ms: Option<u64>,
    pub spotify_url: Option<String>,
    pub is_playing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NowPlaying {
    Playing(NowPlayingTrack),
    Idle { message: String },
}

impl NowPlaying {
    pub fn idle() -> Self {
        NowPlaying::Idle {
            message: "No track is currently playing.".to_string(),
        }
    }
}

impl From<CurrentlyPlayingResponse> for NowPlaying {
    fn from(res: CurrentlyPlayingResponse) -> Self {
        let Some(track) = res.item else {
            return NowPlaying::idle();
        };

        NowPlaying::Playing(NowPlayingTrack {
            artists: track.artist_names(),
            album: track.album_name(),
            album_image: track
                .album
                .as_ref()
                .and_then(|a| a.images.first())
                .and_then(|i| i.url.clone()),
            spotify_url: track.external_urls.and_then(|u| u.spotify),
            name: track.name,
            duration_ms: track.duration_ms,
            progress_ms: res.progress_ms,
            is_playing: res.is_playing,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowedArtist {
    pub id: Option<String>,
    pub name: Option<String>,
    pub genres: Vec<String>,
    pub url: Option<String>,
    pub images: Vec<Image>,
}

impl From<Artist> for FollowedArtist {
    fn from(artist: Artist) -> Self {
        FollowedArtist {
            id: artist.id,
            name: artist.name,
            genres: artist.genres,
            url: artist.external_urls.and_then(|u| u.spotify),
            images: artist.images,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Message {
            message: message.into(),
        }
    }
}
