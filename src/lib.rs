pub mod api;
pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod slug;
pub mod validate;

pub use app::{app, AppState};
