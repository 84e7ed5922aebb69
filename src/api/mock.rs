use super::PlaylistSource;
use crate::error::FetchError;
use crate::models::PlaylistSummary;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::info;

enum Canned {
    Found(PlaylistSummary),
    Api(u16, String),
    Internal(String),
}

/// In-memory source used in tests. Unknown ids answer like Spotify does
/// for a bad id (404 "Invalid playlist Id").
#[derive(Default)]
pub struct MockSource {
    entries: HashMap<String, Canned>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_playlist(mut self, id: &str, summary: PlaylistSummary) -> Self {
        self.entries.insert(id.to_string(), Canned::Found(summary));
        self
    }

    pub fn with_api_error(mut self, id: &str, status: u16, message: &str) -> Self {
        self.entries
            .insert(id.to_string(), Canned::Api(status, message.to_string()));
        self
    }

    pub fn with_internal_error(mut self, id: &str, message: &str) -> Self {
        self.entries
            .insert(id.to_string(), Canned::Internal(message.to_string()));
        self
    }
}

#[async_trait]
impl PlaylistSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn playlist(&self, playlist_id: &str) -> Result<PlaylistSummary, FetchError> {
        info!("MockSource: playlist {}", playlist_id);
        match self.entries.get(playlist_id) {
            Some(Canned::Found(s)) => Ok(s.clone()),
            Some(Canned::Api(status, message)) => Err(FetchError::Api {
                status: *status,
                message: message.clone(),
            }),
            Some(Canned::Internal(message)) => Err(FetchError::Internal(message.clone())),
            None => Err(FetchError::Api {
                status: 404,
                message: "Invalid playlist Id".into(),
            }),
        }
    }
}
