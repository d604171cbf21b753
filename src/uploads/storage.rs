use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::filename::{is_safe_filename, sanitize_filename};
use crate::error::{Error, Result};

const TEMP_DIR: &str = ".incoming";

/// How the stored filename is derived from the client-supplied one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadNaming {
    /// Stored under the sanitised client name; a later upload with the same
    /// name replaces the file.
    Verbatim,
    /// Stored as `<uuid>-<sanitised name>`; uploads never collide.
    #[default]
    Unique,
}

impl UploadNaming {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            UploadNaming::Verbatim => "verbatim",
            UploadNaming::Unique => "unique",
        }
    }
}

impl fmt::Display for UploadNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UploadNaming {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "verbatim" => Ok(UploadNaming::Verbatim),
            "unique" => Ok(UploadNaming::Unique),
            other => Err(Error::Config(format!(
                "unknown upload naming '{other}' (expected 'verbatim' or 'unique')"
            ))),
        }
    }
}

/// Video files on disk, one flat directory.
pub struct UploadStorage {
    base_path: PathBuf,
    naming: UploadNaming,
}

impl UploadStorage {
    pub fn new(upload_dir: &Path, naming: UploadNaming) -> Self {
        Self {
            base_path: upload_dir.to_path_buf(),
            naming,
        }
    }

    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn naming(&self) -> UploadNaming {
        self.naming
    }

    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    /// Name the file will be stored under.
    pub fn stored_name(&self, client_name: &str) -> Result<String> {
        let clean = sanitize_filename(client_name)?;
        Ok(match self.naming {
            UploadNaming::Verbatim => clean,
            UploadNaming::Unique => format!("{}-{clean}", Uuid::new_v4()),
        })
    }

    /// Path of an already stored file. Only names that passed sanitisation resolve.
    pub fn path_of(&self, stored_name: &str) -> Result<PathBuf> {
        if !is_safe_filename(stored_name) {
            return Err(Error::InvalidFilename(stored_name.to_string()));
        }
        Ok(self.base_path.join(stored_name))
    }

    /// Writes the bytes and returns the stored name. The file is written to a
    /// temp path and renamed into place, so readers never see a partial file;
    /// concurrent writers of the same name race and the last rename wins.
    pub async fn save(&self, client_name: &str, data: &[u8]) -> Result<String> {
        let stored_name = self.stored_name(client_name)?;
        let final_path = self.path_of(&stored_name)?;

        let temp_path = self.base_path.join(TEMP_DIR).join(Uuid::new_v4().to_string());
        if let Some(parent) = temp_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = write_and_rename(&temp_path, &final_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(Error::Io(e));
        }

        tracing::debug!(
            "Stored upload '{}' as {} ({} bytes)",
            client_name,
            final_path.display(),
            data.len()
        );

        Ok(stored_name)
    }

    /// Opens a stored file for reading, returning it with its size.
    pub async fn open(&self, stored_name: &str) -> Result<(File, u64)> {
        let path = self.path_of(stored_name)?;
        let file = File::open(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::NotFound
            } else {
                Error::Io(e)
            }
        })?;

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(Error::NotFound);
        }

        Ok((file, metadata.len()))
    }
}

async fn write_and_rename(
    temp_path: &Path,
    final_path: &Path,
    data: &[u8],
) -> std::io::Result<()> {
    let mut temp_file = File::create(temp_path).await?;
    temp_file.write_all(data).await?;
    temp_file.sync_all().await?;
    drop(temp_file);
    fs::rename(temp_path, final_path).await
}
