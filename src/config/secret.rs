use std::fs;
use std::path::Path;

use rand::RngCore;

use crate::error::{Error, Result};

pub const SECRET_FILE: &str = ".session_secret";

const SECRET_BYTES: usize = 32;

/// Reads `<data_dir>/.session_secret`, creating it with a random value when absent.
/// Returns the secret and whether it was newly created.
pub fn load_or_create_secret(data_dir: &Path) -> Result<(String, bool)> {
    let path = data_dir.join(SECRET_FILE);

    if path.exists() {
        let secret = fs::read_to_string(&path)?.trim().to_string();
        if secret.is_empty() {
            return Err(Error::Config(format!(
                "session secret file {} is empty",
                path.display()
            )));
        }
        return Ok((secret, false));
    }

    let mut bytes = [0u8; SECRET_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    let secret = hex::encode(bytes);

    fs::create_dir_all(data_dir)?;
    fs::write(&path, &secret)?;

    #[cfg(unix)]
    set_restrictive_permissions(&path);

    Ok((secret, true))
}

#[cfg(unix)]
fn set_restrictive_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        tracing::warn!("Failed to set permissions on {}: {e}", path.display());
    }
}
