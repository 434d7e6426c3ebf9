//! Camera Hub Server Library
//!
//! Management API over the media relay's routing file, camera access tokens
//! and the building/room layout. Exported for testing and reuse.

pub mod config;
pub mod constants;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod store;

pub use config::Config;
pub use error::{AppError, Result};
pub use store::{open_store, Store};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Config,
}

impl AppState {
    /// Create a new AppState with the given store and configuration
    pub fn new(store: Store, config: Config) -> Self {
        Self { store, config }
    }
}
