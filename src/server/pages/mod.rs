pub mod auth;
pub mod dashboards;
pub mod progress;
pub mod upload;
pub mod videos;
