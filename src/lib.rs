//! URL shortener: an axum service storing slug → long URL mappings in
//! PostgreSQL, plus the client-side link form and HTTP client that submit to it.

pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod form;
pub mod jobs;
pub mod models;
pub mod routes;
pub mod services;
pub mod slug;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod validation;

pub use errors::{AppError, LinkError};
pub use state::AppState;
