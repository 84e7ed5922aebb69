use serde::{Deserialize, Serialize};

/// Substituted for `image_url` when the playlist has no images.
pub const NO_IMAGE: &str = "No image found.";

/// The simplified view of a playlist returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub name: String,
    pub description: Option<String>,
    pub followers: u64,
    pub owner: Option<String>,
    pub total_tracks: u64,
    pub image_url: String,
    pub is_public: Option<bool>,
    pub uri: String,
    pub external_url: String,
}
