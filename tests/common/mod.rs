//! In-process test harness: the full router driven with `tower::ServiceExt::oneshot`,
//! plus a tiny cookie-replaying client.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, HeaderName, Request, StatusCode, header};
use reelcoach::auth::cookie_key;
use reelcoach::config::ServerConfig;
use reelcoach::server::{AppState, create_router};
use reelcoach::store::{SqliteStore, Store};
use reelcoach::types::Role;
use reelcoach::uploads::UploadNaming;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "reelcoach-test-boundary";

pub struct TestApp {
    pub temp_dir: TempDir,
    pub config: ServerConfig,
    pub state: Arc<AppState>,
    router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_naming(UploadNaming::Unique).await
    }

    pub async fn with_naming(naming: UploadNaming) -> Self {
        Self::with_config(|config| config.upload_naming = naming).await
    }

    pub async fn with_max_upload_bytes(max_upload_bytes: usize) -> Self {
        Self::with_config(|config| config.max_upload_bytes = max_upload_bytes).await
    }

    /// Test defaults (temp data dir, cheap hashing), then `configure`.
    pub async fn with_config(configure: impl FnOnce(&mut ServerConfig)) -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let mut config = ServerConfig {
            data_dir: temp_dir.path().to_path_buf(),
            pbkdf2_iterations: 1_000,
            ..ServerConfig::default()
        };
        configure(&mut config);

        let store = SqliteStore::new(config.db_path()).expect("open store");
        store.initialize().expect("initialize schema");

        let state = AppState::new(Arc::new(store), &config, cookie_key("test-secret"))
            .expect("build state");
        state.uploads.ensure_dir().await.expect("create upload dir");

        let state = Arc::new(state);
        let router = create_router(Arc::clone(&state));

        Self {
            temp_dir,
            config,
            state,
            router,
        }
    }

    pub fn client(&self) -> Client {
        Client {
            router: self.router.clone(),
            cookies: BTreeMap::new(),
        }
    }

    /// A client already signed in as a fresh account.
    pub async fn signed_in(&self, username: &str, role: Role) -> Client {
        let mut client = self.client();
        let res = client.register(username, "pw-123", role).await;
        assert_eq!(res.location.as_deref(), Some("/login"));
        let res = client.login(username, "pw-123").await;
        assert_eq!(res.location.as_deref(), Some(role.dashboard_path()));
        client
    }

    pub fn upload_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.config.upload_path())
            .expect("read upload dir")
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

/// Sends requests against the router and replays cookies like a browser.
pub struct Client {
    router: Router,
    cookies: BTreeMap<String, String>,
}

impl Client {
    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = self.request("GET", path).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// GET with a hand-written Cookie header instead of the replayed ones.
    pub async fn get_with_cookie(&mut self, path: &str, cookie: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = self
            .request("POST", path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Posts `multipart/form-data`; `file` is `(client filename, bytes)`.
    pub async fn post_multipart(
        &mut self,
        path: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &[u8])>,
    ) -> TestResponse {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((filename, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = self
            .request("POST", path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn register(&mut self, username: &str, password: &str, role: Role) -> TestResponse {
        self.post_form(
            "/register",
            &[
                ("username", username),
                ("password", password),
                ("role", role.as_str()),
            ],
        )
        .await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> TestResponse {
        self.post_form("/login", &[("username", username), ("password", password)])
            .await
    }

    pub async fn upload(
        &mut self,
        title: &str,
        category: &str,
        filename: &str,
        data: &[u8],
    ) -> TestResponse {
        self.post_multipart(
            "/upload",
            &[
                ("title", title),
                ("description", "Watch closely"),
                ("category", category),
            ],
            Some((filename, data)),
        )
        .await
    }

    fn request(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(path);
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        for value in response.headers().get_all(header::SET_COOKIE) {
            let value = value.to_str().unwrap();
            let (pair, attrs) = value.split_once(';').unwrap_or((value, ""));
            let (name, cookie_value) = pair.split_once('=').unwrap();
            let removed = cookie_value.is_empty() || attrs.contains("Max-Age=0");
            if removed {
                self.cookies.remove(name.trim());
            } else {
                self.cookies
                    .insert(name.trim().to_string(), cookie_value.to_string());
            }
        }

        let status = response.status();
        let location = header_value(response.headers(), header::LOCATION);
        let content_type = header_value(response.headers(), header::CONTENT_TYPE);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            location,
            content_type,
            body,
        }
    }
}

fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .map(|v| v.to_str().unwrap().to_string())
}
