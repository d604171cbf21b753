use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};

use super::Session;
use crate::server::AppState;
use crate::server::response::PageError;
use crate::types::{Role, User};

/// Identity restored from the session cookie, if it still resolves to an account.
pub struct CurrentUser {
    pub user: Option<User>,
    pub session: Session,
}

/// Extractor that requires a signed-in user of any role
pub struct RequireLogin {
    pub user: User,
    pub session: Session,
}

/// Extractor that requires a signed-in owner
pub struct RequireOwner {
    pub user: User,
    pub session: Session,
}

/// Extractor that requires a signed-in employee
pub struct RequireEmployee {
    pub user: User,
    pub session: Session,
}

/// Guard rejections are redirects, never error statuses.
pub enum AuthRedirect {
    /// Anonymous request; send to the login form and come back afterwards.
    /// `session` carries cookie changes made while resolving the user, such
    /// as clearing a stale login.
    Login {
        next: String,
        session: Option<Session>,
    },
    /// Signed in with the wrong role; send to the neutral landing page.
    Landing,
    InternalError,
}

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        match self {
            AuthRedirect::Login { next, session } => {
                let target = format!("/login?next={}", urlencoding::encode(&next));
                match session {
                    Some(session) => (session, Redirect::to(&target)).into_response(),
                    None => Redirect::to(&target).into_response(),
                }
            }
            AuthRedirect::Landing => Redirect::to("/").into_response(),
            AuthRedirect::InternalError => {
                PageError::internal("Failed to load session").into_response()
            }
        }
    }
}

impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(Session::from_headers(&parts.headers, state.cookie_key.clone()))
    }
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AuthRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_headers(&parts.headers, state.cookie_key.clone());
        let (user, session) = resolve_user(state, session)?;
        Ok(CurrentUser { user, session })
    }
}

impl FromRequestParts<Arc<AppState>> for RequireLogin {
    type Rejection = AuthRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let (user, session) = require_user(parts, state)?;
        Ok(RequireLogin { user, session })
    }
}

impl FromRequestParts<Arc<AppState>> for RequireOwner {
    type Rejection = AuthRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let (user, session) = require_role(parts, state, Role::Owner)?;
        Ok(RequireOwner { user, session })
    }
}

impl FromRequestParts<Arc<AppState>> for RequireEmployee {
    type Rejection = AuthRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let (user, session) = require_role(parts, state, Role::Employee)?;
        Ok(RequireEmployee { user, session })
    }
}

/// Looks up the session's user id. A stale id (account gone) is dropped
/// from the session and the request continues anonymously.
fn resolve_user(
    state: &Arc<AppState>,
    session: Session,
) -> Result<(Option<User>, Session), AuthRedirect> {
    let Some(user_id) = session.user_id() else {
        return Ok((None, session));
    };

    match state.store.get_user(&user_id) {
        Ok(Some(user)) => Ok((Some(user), session)),
        Ok(None) => {
            tracing::debug!("Session refers to unknown user {user_id}; treating as anonymous");
            Ok((None, session.log_out()))
        }
        Err(e) => {
            tracing::error!("Failed to load session user: {e}");
            Err(AuthRedirect::InternalError)
        }
    }
}

fn require_user(parts: &Parts, state: &Arc<AppState>) -> Result<(User, Session), AuthRedirect> {
    let session = Session::from_headers(&parts.headers, state.cookie_key.clone());
    match resolve_user(state, session)? {
        (Some(user), session) => Ok((user, session)),
        (None, session) => Err(AuthRedirect::Login {
            next: parts
                .uri
                .path_and_query()
                .map_or_else(|| parts.uri.path().to_string(), |pq| pq.as_str().to_string()),
            session: Some(session),
        }),
    }
}

fn require_role(
    parts: &Parts,
    state: &Arc<AppState>,
    role: Role,
) -> Result<(User, Session), AuthRedirect> {
    let (user, session) = require_user(parts, state)?;
    if user.role != role {
        tracing::debug!(
            "'{}' ({}) is not allowed on {}; redirecting",
            user.username,
            user.role,
            parts.uri.path()
        );
        return Err(AuthRedirect::Landing);
    }
    Ok((user, session))
}

/// Returns `next` when it is a local absolute path that is safe to redirect to.
#[must_use]
pub fn safe_redirect_target(next: &str) -> Option<&str> {
    let is_local = next.starts_with('/')
        && !next.starts_with("//")
        && !next.starts_with("/\\")
        && !next.chars().any(char::is_control);
    is_local.then_some(next)
}
