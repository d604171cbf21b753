//! # ReelCoach
//!
//! A small training-video portal: owners upload category-tagged videos,
//! employees browse and watch them. Usable as a standalone binary or as a
//! library.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use reelcoach::auth::cookie_key;
//! use reelcoach::config::ServerConfig;
//! use reelcoach::server::{AppState, create_router};
//! use reelcoach::store::{SqliteStore, Store};
//!
//! let config = ServerConfig::default();
//! let store = SqliteStore::new(config.db_path()).unwrap();
//! store.initialize().unwrap();
//!
//! let state = AppState::new(Arc::new(store), &config, cookie_key("change me")).unwrap();
//! let router = create_router(Arc::new(state));
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Builds the `reelcoach` binary. Disable with `default-features = false`.

pub mod auth;
pub mod chart;
pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod types;
pub mod uploads;
