use crate::api::PlaylistSource;
use crate::error::FetchError;
use crate::models::PlaylistSummary;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn PlaylistSource>,
}

pub fn router(source: Arc<dyn PlaylistSource>) -> Router {
    Router::new()
        .route("/playlist/{playlist_id}", get(get_playlist))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { source })
}

async fn get_playlist(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<PlaylistSummary>, FetchError> {
    // An id axum cannot decode (e.g. `%FF`) can never name a playlist.
    let Path(playlist_id) = path.map_err(|rej| FetchError::Api {
        status: rej.status().as_u16(),
        message: rej.body_text(),
    })?;
    let summary = state.source.playlist(&playlist_id).await?;
    info!(
        "served playlist {} from {} ({} tracks)",
        playlist_id,
        state.source.name(),
        summary.total_tracks
    );
    Ok(Json(summary))
}

// API errors become 404 whatever status Spotify used; the status stays in the log.
impl IntoResponse for FetchError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            FetchError::Api { status, .. } => {
                warn!("Spotify API error (upstream status {}): {}", status, self);
                (StatusCode::NOT_FOUND, format!("Spotify API error: {}", self))
            }
            FetchError::Internal(_) => {
                error!("playlist lookup failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("An unexpected error occurred: {}", self),
                )
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Serve until Ctrl-C.
pub async fn serve(listener: TcpListener, app: Router) -> anyhow::Result<()> {
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
