//! Library demo server
//!
//! A book catalog exposed as a REST JSON API. The `Book` aggregate owns its
//! authorship and edition records and silently drops duplicates when they are
//! attached; a landing menu lists the demo routes.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
