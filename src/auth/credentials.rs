use chrono::Utc;
use uuid::Uuid;

use super::PasswordHasher;
use crate::error::{Error, Result};
use crate::store::UserStore;
use crate::types::{Role, User};

const MAX_USERNAME_LEN: usize = 150;

pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(Error::BadRequest("Username cannot be empty".to_string()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(Error::BadRequest(format!(
            "Username cannot exceed {MAX_USERNAME_LEN} characters"
        )));
    }
    if username.contains(char::is_whitespace) {
        return Err(Error::BadRequest(
            "Username cannot contain whitespace".to_string(),
        ));
    }
    Ok(())
}

/// Creates an account. Registration never signs the user in.
pub fn register<S: UserStore + ?Sized>(
    store: &S,
    hasher: &PasswordHasher,
    username: &str,
    password: &str,
    role: Role,
) -> Result<User> {
    validate_username(username)?;
    if password.is_empty() {
        return Err(Error::BadRequest("Password cannot be empty".to_string()));
    }

    if store.get_user_by_username(username)?.is_some() {
        return Err(Error::DuplicateUsername);
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        username: username.to_string(),
        password_hash: hasher.hash(password),
        role,
        created_at: Utc::now(),
    };

    store.create_user(&user)?;
    tracing::info!("Registered {} account '{}'", user.role, user.username);

    Ok(user)
}

/// Checks a login attempt. Unknown usernames and wrong passwords both
/// yield `Error::InvalidCredentials`.
pub fn authenticate<S: UserStore + ?Sized>(
    store: &S,
    hasher: &PasswordHasher,
    username: &str,
    password: &str,
) -> Result<User> {
    let Some(user) = store.get_user_by_username(username)? else {
        return Err(Error::InvalidCredentials);
    };

    match hasher.verify(password, &user.password_hash) {
        Ok(true) => Ok(user),
        Ok(false) => Err(Error::InvalidCredentials),
        Err(e) => {
            tracing::warn!("Stored hash for '{}' is unusable: {e}", user.username);
            Err(Error::InvalidCredentials)
        }
    }
}
