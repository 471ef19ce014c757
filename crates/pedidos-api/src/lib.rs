//! Pedidos HTTP API.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::sync::Arc;

use pedidos_core::storage::Storage;

pub mod config;
pub mod error;
pub mod handlers;
pub mod server;

pub use config::Config;
pub use error::{ApiError, MessageResponse};
pub use server::{create_router, start_server};

/// Shared application state injected into every handler.
///
/// Carrying the repository aggregate (rather than a raw pool) keeps
/// handlers decoupled from the schema and lets tests construct the state
/// against their own database.
#[derive(Clone)]
pub struct AppState {
    /// Repository aggregate for all database access.
    pub storage: Arc<Storage>,
}

impl AppState {
    /// Creates application state over a connection pool.
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { storage: Arc::new(Storage::new(pool)) }
    }
}
