use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Redirect, Response};
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::auth::{RequireOwner, Session};
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{UploadForm, UploadedFile};
use crate::server::response::{PageError, StoreResultExt};
use crate::server::views::{UploadPage, render_page};
use crate::types::{User, Video};

const MIB: usize = 1024 * 1024;

/// GET /upload
pub async fn upload_form(
    RequireOwner { user, session }: RequireOwner,
    State(state): State<Arc<AppState>>,
) -> Result<Response, PageError> {
    upload_page(&state, session, user)
}

/// POST /upload - stores the file, then records it in the catalog
pub async fn upload_video(
    RequireOwner { user, session }: RequireOwner,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, PageError> {
    let form = parse_upload_form(&mut multipart).await?;

    let title = required_field(form.title, "title")?;
    let category = required_field(form.category, "category")?;
    // may be empty, but the field itself must be sent
    let description = form
        .description
        .ok_or_else(|| missing_field("description"))?;

    let Some(file) = form.file else {
        return upload_page(&state, session.flash("No file selected."), user);
    };

    let stored_name = match state.uploads.save(&file.name, &file.data).await {
        Ok(name) => name,
        Err(Error::InvalidFilename(name)) => {
            warn!("Rejected upload with unusable filename '{name}'");
            return upload_page(
                &state,
                session.flash("That file name cannot be used. Please rename the file."),
                user,
            );
        }
        Err(e) => {
            error!("Failed to store upload '{}': {e}", file.name);
            return Err(PageError::internal("Failed to store video"));
        }
    };

    let video = state
        .store
        .add_video(&Video {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            filename: stored_name,
            category,
            created_at: Utc::now(),
        })
        .page_err("Failed to save video")?;

    info!(
        "'{}' uploaded '{}' as {} ({} bytes) to '{}'",
        user.username,
        video.title,
        video.filename,
        file.data.len(),
        video.category
    );

    Ok((session.flash("Video uploaded."), Redirect::to("/owner")).into_response())
}

fn upload_page(state: &AppState, session: Session, user: User) -> Result<Response, PageError> {
    let (session, flashes) = session.take_flashes();
    let html = render_page(&UploadPage {
        flashes,
        username: Some(user.username),
        max_upload_mib: state.max_upload_bytes / MIB,
    })?;
    Ok((session, html).into_response())
}

/// Present and not blank. The value is kept exactly as sent; categories are
/// matched verbatim when listed.
fn required_field(value: Option<String>, name: &str) -> Result<String, PageError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| missing_field(name))
}

fn missing_field(name: &str) -> PageError {
    PageError::bad_request(format!("Missing form field: {name}"))
}

async fn parse_upload_form(multipart: &mut Multipart) -> Result<UploadForm, PageError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let client_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                // an empty file input still sends a part, with no filename
                if !client_name.is_empty() {
                    form.file = Some(UploadedFile {
                        name: client_name,
                        data,
                    });
                }
            }
            Some("title") => form.title = Some(field.text().await?),
            Some("description") => form.description = Some(field.text().await?),
            Some("category") => form.category = Some(field.text().await?),
            _ => {}
        }
    }

    Ok(form)
}
