//! API routes for the profile server.

pub mod error;
pub mod profile;
pub mod request_id;
mod routes;
pub mod terrain;

use crate::config::Config;
use axum::Router;

pub use error::ApiError;

pub fn routes(config: &Config) -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router(config)
}

#[cfg(test)]
mod tests;
