//! BookHub Server Library
//!
//! A book-rental store and a social posting service sharing one user base,
//! one database and one JWT scheme. This module exports the core types for
//! the binary and for integration tests.

pub mod auth;
pub mod clients;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;

pub use auth::AuthUser;
pub use config::Config;
pub use db::Db;
pub use error::{AppError, Result};

use std::sync::Arc;

use clients::{InvoiceGateway, JokeSource};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Config,
    pub jokes: Arc<dyn JokeSource>,
    /// Present only when an invoice API key is configured
    pub invoices: Option<Arc<dyn InvoiceGateway>>,
}

impl AppState {
    /// Create a new AppState with the given database, configuration and clients
    pub fn new(
        db: Db,
        config: Config,
        jokes: Arc<dyn JokeSource>,
        invoices: Option<Arc<dyn InvoiceGateway>>,
    ) -> Self {
        Self {
            db,
            config,
            jokes,
            invoices,
        }
    }
}
