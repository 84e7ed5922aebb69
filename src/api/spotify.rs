use super::spotify_auth::TokenProvider;
use super::PlaylistSource;
use crate::config::{Config, Credentials};
use crate::error::FetchError;
use crate::models::{PlaylistSummary, NO_IMAGE};
use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;

static SPOTIFY_URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        concat!(
            r"^spotify:(?:(?P<type>track|artist|album|playlist|show|episode|audiobook)",
            r":(?P<id>[0-9A-Za-z]+)",
            r"|user:[0-9A-Za-z]+:playlist:(?P<playlistid>[0-9A-Za-z]+))$",
        ),
    )
    .unwrap()
});

static SPOTIFY_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        concat!(
            r"^(?:https?://)?open\.spotify\.com/(?:intl-\w\w/)?",
            r"(?P<type>track|artist|album|playlist|show|episode|user|audiobook)",
            r"/(?P<id>[0-9A-Za-z]+)(?:\?.*)?$",
        ),
    )
    .unwrap()
});

/// Reduce a Spotify URI or open.spotify.com URL to the bare playlist id.
/// Anything else is handed to Spotify untouched.
pub fn playlist_id_from_input(input: &str) -> Result<String, FetchError> {
    if let Some(caps) = SPOTIFY_URI.captures(input) {
        if let Some(id) = caps.name("playlistid") {
            return Ok(id.as_str().to_string());
        }
        if &caps["type"] != "playlist" {
            return Err(FetchError::Api {
                status: 400,
                message: "Unexpected Spotify URI type.".into(),
            });
        }
        return Ok(caps["id"].to_string());
    }
    if let Some(caps) = SPOTIFY_URL.captures(input) {
        if &caps["type"] != "playlist" {
            return Err(FetchError::Api {
                status: 400,
                message: "Unexpected Spotify URL type.".into(),
            });
        }
        return Ok(caps["id"].to_string());
    }
    Ok(input.to_string())
}

// Wire shapes of GET /playlists/{id}; only the fields we project.
#[derive(Debug, Deserialize)]
struct PlaylistObject {
    name: String,
    description: Option<String>,
    followers: Followers,
    owner: Owner,
    tracks: TracksRef,
    #[serde(default)]
    images: Option<Vec<Image>>,
    public: Option<bool>,
    uri: String,
    external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
struct Followers {
    total: u64,
}

#[derive(Debug, Deserialize)]
struct Owner {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TracksRef {
    total: u64,
}

#[derive(Debug, Deserialize)]
struct Image {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ExternalUrls {
    spotify: String,
}

impl From<PlaylistObject> for PlaylistSummary {
    fn from(p: PlaylistObject) -> Self {
        let image_url = p
            .images
            .and_then(|imgs| imgs.into_iter().next())
            .map(|img| img.url)
            .unwrap_or_else(|| NO_IMAGE.to_string());
        PlaylistSummary {
            name: p.name,
            description: p.description,
            followers: p.followers.total,
            owner: p.owner.display_name,
            total_tracks: p.tracks.total,
            image_url,
            is_public: p.public,
            uri: p.uri,
            external_url: p.external_urls.spotify,
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Read-only Spotify Web API client authenticated with app credentials.
/// Built once at startup and shared by every request handler.
pub struct SpotifyClient {
    client: Client,
    api_base: String,
    tokens: TokenProvider,
}

impl SpotifyClient {
    pub fn new(cfg: &Config, credentials: Credentials) -> Result<Self> {
        let client = Client::builder().timeout(cfg.request_timeout()).build()?;
        let tokens = TokenProvider::new(
            client.clone(),
            credentials,
            cfg.auth_base.clone(),
            cfg.token_expiry_margin_secs,
        );
        Ok(Self {
            client,
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn tokens(&self) -> &TokenProvider {
        &self.tokens
    }

    /// Look up one playlist and project it into a [`PlaylistSummary`].
    pub async fn fetch_playlist(&self, playlist_id: &str) -> Result<PlaylistSummary, FetchError> {
        let id = playlist_id_from_input(playlist_id)?;
        let bearer = self.tokens.get_valid_token().await?.bearer();
        let url = format!(
            "{}/playlists/{}",
            self.api_base,
            urlencoding::encode(&id)
        );
        debug!("GET {}", url);
        let resp = self
            .client
            .get(&url)
            .query(&[("additional_types", "track")])
            .header(AUTHORIZATION, &bearer)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => envelope.error.message,
                Err(_) if body.trim().is_empty() => status
                    .canonical_reason()
                    .unwrap_or("error")
                    .to_string(),
                Err(_) => body,
            };
            debug!("Spotify rejected playlist {}: {} {}", id, status, message);
            return Err(FetchError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let playlist: PlaylistObject = serde_json::from_str(&body)?;
        Ok(playlist.into())
    }
}

#[async_trait]
impl PlaylistSource for SpotifyClient {
    fn name(&self) -> &str {
        "spotify"
    }

    async fn playlist(&self, playlist_id: &str) -> Result<PlaylistSummary, FetchError> {
        self.fetch_playlist(playlist_id).await
    }
}
