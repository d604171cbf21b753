pub mod dto;
mod pages;
pub mod response;
mod router;
pub mod views;

pub use router::{AppState, create_router};
