pub mod spotify;
pub mod mock;
pub mod spotify_auth;

use crate::error::FetchError;
use crate::models::PlaylistSummary;

/// Where the HTTP layer gets playlists from.
/// Implementations: spotify::SpotifyClient and mock::MockSource.
#[async_trait::async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Look up a playlist by caller-supplied id and return its summary.
    async fn playlist(&self, playlist_id: &str) -> Result<PlaylistSummary, FetchError>;

    /// Return the source's name (for logging)
    fn name(&self) -> &str;
}
