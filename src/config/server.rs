use std::net::SocketAddr;
use std::path::PathBuf;

use crate::auth::DEFAULT_ITERATIONS;
use crate::uploads::UploadNaming;

pub const DB_FILE: &str = "reelcoach.db";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Where uploaded videos are written. Defaults to `<data_dir>/uploads`.
    pub upload_dir: Option<PathBuf>,
    /// Secret the session cookie key is derived from. When unset, the secret
    /// stored in the data directory is used (and created on first start).
    pub session_secret: Option<String>,
    pub upload_naming: UploadNaming,
    pub max_upload_bytes: usize,
    pub pbkdf2_iterations: u32,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    #[must_use]
    pub fn upload_path(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("uploads"))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            upload_dir: None,
            session_secret: None,
            upload_naming: UploadNaming::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            pbkdf2_iterations: DEFAULT_ITERATIONS,
        }
    }
}
