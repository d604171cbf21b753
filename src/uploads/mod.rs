mod filename;
mod storage;

pub use filename::{is_safe_filename, sanitize_filename};
pub use storage::{UploadNaming, UploadStorage};
