//! REST API routes.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{profile, request_id, terrain};
use crate::config::Config;
use crate::state::AppState;

/// Create the API router.
pub fn create_router(config: &Config) -> Router<Arc<AppState>> {
    tracing::debug!(
        max_samples = config.max_samples,
        step_m = config.default_profile.step_m,
        "building router"
    );

    let profile_routes = Router::new()
        .route("/v1/profile", post(profile::compute_profile))
        .route("/v1/terrain/generate", post(terrain::generate_terrain));

    let terrain_routes = Router::new()
        .route(
            "/v1/terrains",
            post(terrain::create_terrain).get(terrain::list_terrains),
        )
        .route(
            "/v1/terrains/:id",
            get(terrain::get_terrain).delete(terrain::delete_terrain),
        )
        .route("/v1/terrains/:id/points", post(terrain::edit_terrain))
        .route("/v1/terrains/:id/profile", post(terrain::terrain_profile));

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(profile_routes)
        .merge(terrain_routes)
        .layer(middleware::from_fn(request_id::tag_request))
}
