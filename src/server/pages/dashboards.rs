use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};

use crate::auth::{RequireEmployee, RequireOwner};
use crate::server::AppState;
use crate::server::response::{PageError, StoreResultExt};
use crate::server::views::{CategoryLink, EmployeeDashboard, OwnerDashboard, VideoRow, render_page};

/// GET /employee - category index
pub async fn employee_dashboard(
    RequireEmployee { user, session }: RequireEmployee,
    State(state): State<Arc<AppState>>,
) -> Result<Response, PageError> {
    let categories = state
        .store
        .list_categories()
        .page_err("Failed to load categories")?;

    let (session, flashes) = session.take_flashes();
    let html = render_page(&EmployeeDashboard {
        flashes,
        username: Some(user.username),
        categories: categories.into_iter().map(CategoryLink::new).collect(),
    })?;
    Ok((session, html).into_response())
}

/// GET /owner - full catalog with an upload link
pub async fn owner_dashboard(
    RequireOwner { user, session }: RequireOwner,
    State(state): State<Arc<AppState>>,
) -> Result<Response, PageError> {
    let videos = state.store.list_videos().page_err("Failed to load videos")?;

    let (session, flashes) = session.take_flashes();
    let html = render_page(&OwnerDashboard {
        flashes,
        username: Some(user.username),
        videos: videos.into_iter().map(|v| VideoRow::new(v, false)).collect(),
    })?;
    Ok((session, html).into_response())
}
