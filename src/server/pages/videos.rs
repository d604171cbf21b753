use std::collections::HashSet;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tokio_util::io::ReaderStream;
use tracing::error;

use crate::auth::{CurrentUser, RequireLogin};
use crate::error::Error;
use crate::server::AppState;
use crate::server::response::{PageError, StoreResultExt};
use crate::server::views::{VideoOverview, VideoRow, render_page};

/// GET /videos/{category}
///
/// Public: anonymous visitors see the listing but the file links still
/// require a login.
pub async fn video_overview(
    CurrentUser { user, session }: CurrentUser,
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Response, PageError> {
    let videos = state
        .store
        .list_videos_by_category(&category)
        .page_err("Failed to load videos")?;

    let watched: HashSet<String> = match &user {
        Some(user) => state
            .store
            .list_user_progress(&user.id)
            .page_err("Failed to load progress")?
            .into_iter()
            .filter(|p| p.watched)
            .map(|p| p.video_id)
            .collect(),
        None => HashSet::new(),
    };

    let rows = videos
        .into_iter()
        .map(|v| {
            let seen = watched.contains(&v.id);
            VideoRow::new(v, seen)
        })
        .collect();

    let (session, flashes) = session.take_flashes();
    let html = render_page(&VideoOverview {
        flashes,
        username: user.map(|u| u.username),
        category,
        videos: rows,
    })?;
    Ok((session, html).into_response())
}

/// GET /uploads/{filename} - streams a stored video file
pub async fn serve_video_file(
    _auth: RequireLogin,
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, PageError> {
    let (file, size) = match state.uploads.open(&filename).await {
        Ok(result) => result,
        Err(Error::NotFound | Error::InvalidFilename(_)) => {
            return Err(PageError::not_found("Video file not found"));
        }
        Err(e) => {
            error!("Failed to open upload '{filename}': {e}");
            return Err(PageError::internal("Failed to read video file"));
        }
    };

    let content_type = mime_guess::from_path(&filename).first_or_octet_stream();
    let body = Body::from_stream(ReaderStream::new(file));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .header(header::CONTENT_LENGTH, size)
        .header("X-Content-Type-Options", "nosniff")
        .body(body)
        .map_err(|e| {
            error!("Failed to build file response: {e}");
            PageError::internal("Failed to read video file")
        })
}
