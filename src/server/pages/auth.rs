use std::sync::Arc;

use axum::Form;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use tracing::{error, info};

use crate::auth::{self, CurrentUser, RequireLogin, Session, safe_redirect_target};
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{LoginForm, LoginQuery, RegisterForm};
use crate::server::response::PageError;
use crate::server::views::{LoginPage, RegisterPage, RoleOption, render_page};
use crate::types::Role;

const LOGIN_FAILED: &str = "Incorrect login details.";

/// GET / - dashboard for a signed-in user, otherwise the login form
pub async fn index(CurrentUser { user, session }: CurrentUser) -> Result<Response, PageError> {
    match user {
        Some(user) => Ok((session, Redirect::to(user.role.dashboard_path())).into_response()),
        None => login_page(session, None, String::new()),
    }
}

/// GET /login
pub async fn login_form(
    CurrentUser { user, session }: CurrentUser,
    Query(query): Query<LoginQuery>,
) -> Result<Response, PageError> {
    let next = query
        .next
        .as_deref()
        .and_then(safe_redirect_target)
        .unwrap_or_default()
        .to_string();
    login_page(session, user.map(|u| u.username), next)
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    let LoginForm {
        username,
        password,
        next,
    } = form;

    let worker = Arc::clone(&state);
    let attempted = username.clone();
    let result = tokio::task::spawn_blocking(move || {
        auth::authenticate(worker.store.as_ref(), &worker.hasher, &attempted, &password)
    })
    .await
    .map_err(|e| {
        error!("Login task failed: {e}");
        PageError::internal("Failed to check credentials")
    })?;

    match result {
        Ok(user) => {
            info!("'{}' logged in as {}", user.username, user.role);
            let target = next
                .as_deref()
                .and_then(safe_redirect_target)
                .unwrap_or(user.role.dashboard_path())
                .to_string();
            Ok((session.log_in(&user.id), Redirect::to(&target)).into_response())
        }
        Err(Error::InvalidCredentials) => {
            info!("Failed login for '{username}'");
            let back = match next.as_deref().and_then(safe_redirect_target) {
                Some(next) => format!("/login?next={}", urlencoding::encode(next)),
                None => "/login".to_string(),
            };
            Ok((session.flash(LOGIN_FAILED), Redirect::to(&back)).into_response())
        }
        Err(e) => {
            error!("Failed to authenticate '{username}': {e}");
            Err(PageError::internal("Failed to check credentials"))
        }
    }
}

/// GET /register
pub async fn register_form(
    CurrentUser { user, session }: CurrentUser,
) -> Result<Response, PageError> {
    let (session, flashes) = session.take_flashes();
    let html = render_page(&RegisterPage {
        flashes,
        username: user.map(|u| u.username),
        roles: RoleOption::all(),
    })?;
    Ok((session, html).into_response())
}

/// POST /register
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, PageError> {
    let Ok(role) = form.role.parse::<Role>() else {
        return Ok((
            session.flash("Please choose a valid role."),
            Redirect::to("/register"),
        )
            .into_response());
    };

    let RegisterForm {
        username, password, ..
    } = form;
    let worker = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || {
        auth::register(worker.store.as_ref(), &worker.hasher, &username, &password, role)
    })
    .await
    .map_err(|e| {
        error!("Registration task failed: {e}");
        PageError::internal("Failed to register")
    })?;

    let (session, target) = match result {
        Ok(_) => (
            session.flash("Registration successful! You can now log in."),
            "/login",
        ),
        Err(Error::DuplicateUsername) => (session.flash("Username already exists."), "/register"),
        Err(Error::BadRequest(message)) => (session.flash(message), "/register"),
        Err(e) => {
            error!("Failed to register user: {e}");
            return Err(PageError::internal("Failed to register"));
        }
    };

    Ok((session, Redirect::to(target)).into_response())
}

/// GET /logout
pub async fn logout(RequireLogin { user, session }: RequireLogin) -> Response {
    info!("'{}' logged out", user.username);
    (
        session.log_out().flash("You have been logged out."),
        Redirect::to("/login"),
    )
        .into_response()
}

fn login_page(
    session: Session,
    username: Option<String>,
    next: String,
) -> Result<Response, PageError> {
    let (session, flashes) = session.take_flashes();
    let html = render_page(&LoginPage {
        flashes,
        username,
        next,
    })?;
    Ok((session, html).into_response())
}
