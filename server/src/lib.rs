// server/src/lib.rs

//! Garments marketplace backend.
//!
//! REST endpoints over three document collections (products, users, orders)
//! served by actix-web. Services own an `Arc<dyn DocumentStore>`; the store is
//! PostgreSQL/JSONB in production and in-memory for tests.

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod web;

pub use errors::{AppError, Result};
pub use state::AppState;
