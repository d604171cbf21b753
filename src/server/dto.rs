use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub role: String,
}

/// A file part of an upload form.
#[derive(Debug)]
pub struct UploadedFile {
    /// Name as sent by the client, unsanitised.
    pub name: String,
    pub data: axum::body::Bytes,
}

/// Parsed `multipart/form-data` body of `POST /upload`.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    /// `None` when the file input was left empty.
    pub file: Option<UploadedFile>,
}
