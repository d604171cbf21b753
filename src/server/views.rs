//! Page models rendered through the templates in `templates/`.
//!
//! Every page carries the pending flash notices and the signed-in username
//! (if any) for the shared layout in `base.html`.

use askama::Template;
use axum::response::Html;

use super::response::PageError;
use crate::types::{Role, Video};

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub flashes: Vec<String>,
    pub username: Option<String>,
    /// Local path to return to after a successful login; empty for the dashboard.
    pub next: String,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub flashes: Vec<String>,
    pub username: Option<String>,
    pub roles: Vec<RoleOption>,
}

pub struct RoleOption {
    pub value: &'static str,
    pub label: &'static str,
}

impl RoleOption {
    #[must_use]
    pub fn all() -> Vec<RoleOption> {
        Role::ALL
            .iter()
            .map(|role| RoleOption {
                value: role.as_str(),
                label: match role {
                    Role::Employee => "Employee",
                    Role::Owner => "Owner",
                },
            })
            .collect()
    }
}

#[derive(Template)]
#[template(path = "employee.html")]
pub struct EmployeeDashboard {
    pub flashes: Vec<String>,
    pub username: Option<String>,
    pub categories: Vec<CategoryLink>,
}

pub struct CategoryLink {
    pub name: String,
    pub href: String,
}

impl CategoryLink {
    #[must_use]
    pub fn new(name: String) -> Self {
        let href = category_href(&name);
        Self { name, href }
    }
}

#[derive(Template)]
#[template(path = "owner.html")]
pub struct OwnerDashboard {
    pub flashes: Vec<String>,
    pub username: Option<String>,
    pub videos: Vec<VideoRow>,
}

#[derive(Template)]
#[template(path = "upload.html")]
pub struct UploadPage {
    pub flashes: Vec<String>,
    pub username: Option<String>,
    pub max_upload_mib: usize,
}

#[derive(Template)]
#[template(path = "videos.html")]
pub struct VideoOverview {
    pub flashes: Vec<String>,
    pub username: Option<String>,
    pub category: String,
    pub videos: Vec<VideoRow>,
}

/// A video as listed on a page, with its links already built.
pub struct VideoRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub filename: String,
    pub file_href: String,
    pub category_href: String,
    pub watched: bool,
}

impl VideoRow {
    #[must_use]
    pub fn new(video: Video, watched: bool) -> Self {
        Self {
            file_href: format!("/uploads/{}", urlencoding::encode(&video.filename)),
            category_href: category_href(&video.category),
            id: video.id,
            title: video.title,
            description: video.description,
            category: video.category,
            filename: video.filename,
            watched,
        }
    }
}

#[derive(Template)]
#[template(path = "progress.html")]
pub struct ProgressPage {
    pub flashes: Vec<String>,
    pub username: Option<String>,
    pub title: &'static str,
    pub y_label: &'static str,
    pub bars: Vec<BarRow>,
    pub content_type: &'static str,
    /// Base64 encoded chart image.
    pub chart_data: String,
}

pub struct BarRow {
    pub label: &'static str,
    pub count: usize,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub flashes: Vec<String>,
    pub username: Option<String>,
    pub status: u16,
    pub reason: &'static str,
    pub message: String,
}

#[must_use]
pub fn category_href(category: &str) -> String {
    format!("/videos/{}", urlencoding::encode(category))
}

pub fn render_page<T: Template>(page: &T) -> Result<Html<String>, PageError> {
    page.render().map(Html).map_err(|e| {
        tracing::error!("Failed to render template: {e}");
        PageError::internal("Failed to render page")
    })
}
