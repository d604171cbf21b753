mod models;
mod role;

pub use models::{Progress, User, Video};
pub use role::Role;
