pub mod credentials;
mod middleware;
mod password;
mod session;

pub use credentials::{authenticate, register};
pub use middleware::{
    AuthRedirect, CurrentUser, RequireEmployee, RequireLogin, RequireOwner, safe_redirect_target,
};
pub use password::{DEFAULT_ITERATIONS, PasswordHasher};
pub use session::{FLASH_COOKIE, SESSION_COOKIE, Session, cookie_key};
