use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::RequireLogin;
use crate::chart::{self, CHART_TITLE, Y_AXIS_LABEL};
use crate::server::AppState;
use crate::server::response::{PageError, StoreOptionExt, StoreResultExt};
use crate::server::views::{BarRow, ProgressPage, category_href, render_page};
use crate::types::Progress;

/// GET /progress - bar chart of watched vs not watched videos
pub async fn progress_page(
    RequireLogin { user, session }: RequireLogin,
    State(state): State<Arc<AppState>>,
) -> Result<Response, PageError> {
    let videos = state.store.list_videos().page_err("Failed to load videos")?;

    let (counts, image) = chart::render_progress(&videos, state.chart.as_ref()).map_err(|e| {
        error!("Failed to render progress chart: {e}");
        PageError::internal("Failed to render chart")
    })?;

    let (session, flashes) = session.take_flashes();
    let html = render_page(&ProgressPage {
        flashes,
        username: Some(user.username),
        title: CHART_TITLE,
        y_label: Y_AXIS_LABEL,
        bars: counts
            .bars()
            .into_iter()
            .map(|(label, count)| BarRow { label, count })
            .collect(),
        content_type: state.chart.content_type(),
        chart_data: STANDARD.encode(image),
    })?;
    Ok((session, html).into_response())
}

/// POST /progress/{video_id} - marks a video watched for the current user
pub async fn mark_watched(
    RequireLogin { user, session }: RequireLogin,
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<Response, PageError> {
    let video = state
        .store
        .get_video(&video_id)
        .page_err("Failed to load video")?
        .or_not_found("Video not found")?;

    let progress = Progress {
        id: Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        video_id: video.id.clone(),
        watched: true,
        updated_at: Utc::now(),
    };
    state
        .store
        .set_watched(&progress)
        .page_err("Failed to record progress")?;

    info!("'{}' watched '{}'", user.username, video.title);

    Ok((
        session.flash(format!("Marked \"{}\" as watched.", video.title)),
        Redirect::to(&category_href(&video.category)),
    )
        .into_response())
}
