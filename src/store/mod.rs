mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Account records.
pub trait UserStore {
    /// Fails with `Error::DuplicateUsername` when the username is taken.
    fn create_user(&self, user: &User) -> Result<()>;
    fn get_user(&self, id: &str) -> Result<Option<User>>;
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    fn list_users(&self) -> Result<Vec<User>>;
}

/// Video catalog. Listings come back in insertion order.
pub trait VideoStore {
    /// Inserts the video, or replaces title, description and category of the
    /// record that already owns `video.filename`. Returns the stored record.
    fn add_video(&self, video: &Video) -> Result<Video>;
    fn get_video(&self, id: &str) -> Result<Option<Video>>;
    fn list_videos(&self) -> Result<Vec<Video>>;
    fn list_videos_by_category(&self, category: &str) -> Result<Vec<Video>>;
    fn list_categories(&self) -> Result<Vec<String>>;
}

/// Per-user watched flags.
pub trait ProgressStore {
    fn set_watched(&self, progress: &Progress) -> Result<()>;
    fn list_user_progress(&self, user_id: &str) -> Result<Vec<Progress>>;
}

/// Store defines the database interface.
pub trait Store: UserStore + VideoStore + ProgressStore + Send + Sync {
    fn initialize(&self) -> Result<()>;
}
