use crate::error::{Error, Result};

const MAX_FILENAME_LEN: usize = 200;

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_'
}

/// Reduces a client-supplied filename to a single safe path component.
///
/// Directory parts (either separator) are dropped, control characters removed,
/// anything outside `[A-Za-z0-9._-]` becomes `_`, and leading dots are stripped so
/// the result can never be `.`, `..` or a hidden file.
pub fn sanitize_filename(raw: &str) -> Result<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if is_allowed_char(c) { c } else { '_' })
        .collect();

    let mut name = cleaned.trim_start_matches('.').to_string();
    name.truncate(MAX_FILENAME_LEN);

    if name.is_empty() || name.chars().all(|c| c == '_') {
        return Err(Error::InvalidFilename(raw.to_string()));
    }

    Ok(name)
}

/// True when `name` is already in the form `sanitize_filename` produces.
#[must_use]
pub fn is_safe_filename(name: &str) -> bool {
    sanitize_filename(name).is_ok_and(|clean| clean == name)
}
