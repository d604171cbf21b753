use std::sync::Arc;
use std::time::Instant;

use axum::extract::{DefaultBodyLimit, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{
    Router,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;

use super::pages::{auth, dashboards, progress, upload, videos};
use super::response::PageError;
use crate::auth::PasswordHasher;
use crate::chart::{BarChartRenderer, ChartRenderer};
use crate::config::ServerConfig;
use crate::error::Result;
use crate::store::Store;
use crate::uploads::UploadStorage;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub hasher: PasswordHasher,
    pub uploads: UploadStorage,
    pub chart: Box<dyn ChartRenderer>,
    /// Encrypts the session and flash cookies.
    pub cookie_key: Key,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: &ServerConfig, cookie_key: Key) -> Result<Self> {
        Ok(Self {
            store,
            hasher: PasswordHasher::with_iterations(config.pbkdf2_iterations)?,
            uploads: UploadStorage::new(&config.upload_path(), config.upload_naming),
            chart: Box::new(BarChartRenderer::default()),
            cookie_key,
            max_upload_bytes: config.max_upload_bytes,
        })
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn not_found() -> PageError {
    PageError::not_found("Page not found")
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/health", get(health))
        // Accounts
        .route("/", get(auth::index))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/logout", get(auth::logout))
        // Dashboards
        .route("/employee", get(dashboards::employee_dashboard))
        .route("/owner", get(dashboards::owner_dashboard))
        // Videos
        .route(
            "/upload",
            get(upload::upload_form)
                .post(upload::upload_video)
                .layer(upload_limit),
        )
        .route("/videos/{category}", get(videos::video_overview))
        .route("/uploads/{filename}", get(videos::serve_video_file))
        // Progress
        .route("/progress", get(progress::progress_page))
        .route("/progress/{video_id}", post(progress::mark_watched))
        .fallback(not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
