mod secret;
mod server;

pub use secret::{SECRET_FILE, load_or_create_secret};
pub use server::{DB_FILE, DEFAULT_MAX_UPLOAD_BYTES, ServerConfig};
