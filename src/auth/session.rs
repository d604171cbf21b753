use std::convert::Infallible;

use axum::http::HeaderMap;
use axum::response::{IntoResponseParts, ResponseParts};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use sha2::{Digest, Sha512};

pub const SESSION_COOKIE: &str = "reelcoach_session";
pub const FLASH_COOKIE: &str = "reelcoach_flash";

const FLASH_SEPARATOR: char = '\n';

/// Derives the cookie encryption key from the configured session secret.
#[must_use]
pub fn cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Encrypted cookie session: the signed-in user id plus pending flash notices.
///
/// Return it from a handler (as a response part) to persist any changes.
pub struct Session {
    jar: PrivateCookieJar,
}

impl Session {
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, key: Key) -> Self {
        Self {
            jar: PrivateCookieJar::from_headers(headers, key),
        }
    }

    /// The user id stored at login. Cookies that fail decryption are ignored.
    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        self.jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_owned())
            .filter(|id| !id.is_empty())
    }

    #[must_use]
    pub fn log_in(self, user_id: &str) -> Self {
        Self {
            jar: self.jar.add(build_cookie(SESSION_COOKIE, user_id.to_string())),
        }
    }

    #[must_use]
    pub fn log_out(self) -> Self {
        Self {
            jar: self.jar.remove(clear_cookie(SESSION_COOKIE)),
        }
    }

    /// Queues a notice for the next rendered page.
    #[must_use]
    pub fn flash(self, message: impl Into<String>) -> Self {
        let message = message.into().replace(FLASH_SEPARATOR, " ");
        let value = match self.jar.get(FLASH_COOKIE) {
            Some(existing) if !existing.value().is_empty() => {
                format!("{}{FLASH_SEPARATOR}{message}", existing.value())
            }
            _ => message,
        };

        Self {
            jar: self.jar.add(build_cookie(FLASH_COOKIE, value)),
        }
    }

    /// Removes and returns the queued notices.
    #[must_use]
    pub fn take_flashes(self) -> (Self, Vec<String>) {
        let Some(cookie) = self.jar.get(FLASH_COOKIE) else {
            return (self, Vec::new());
        };

        let messages = cookie
            .value()
            .split(FLASH_SEPARATOR)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();

        let session = Self {
            jar: self.jar.remove(clear_cookie(FLASH_COOKIE)),
        };
        (session, messages)
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.jar.into_response_parts(res)
    }
}

fn build_cookie(name: &str, value: String) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn clear_cookie(name: &str) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
