//! Terrain endpoints.
//!
//! Terrains are edited sample by sample (or by dragging a ramp between two
//! samples) and profiled on demand at the requested step.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::sync::Arc;
use tf_core::{check_grid, ProfileConfig, ResampleMode, TerrainProfile};

use crate::api::profile::{run_profile, ProfileResponse};
use crate::api::request_id::RequestId;
use crate::api::ApiError;
use crate::config::Config;
use crate::state::{AppState, StoredTerrain, TerrainSummary};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    pub length: Option<usize>,
    pub grid_m: Option<f64>,
    pub max_height_m: Option<f64>,
    /// Fixed seed for reproducible terrain
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTerrainRequest {
    /// Explicit heights; wins over `generate`
    pub values: Option<Vec<f64>>,
    #[serde(default)]
    pub generate: bool,
    #[serde(flatten)]
    pub shape: GenerateRequest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditTerrainRequest {
    pub index: usize,
    pub height_m: f64,
    /// Previous drag position; the samples in between are filled linearly
    pub from_index: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TerrainProfileRequest {
    pub config: Option<ProfileConfig>,
    pub resample: Option<ResampleMode>,
    pub waypoints: Option<Vec<bool>>,
}

fn build_terrain(config: &Config, shape: &GenerateRequest) -> Result<TerrainProfile, ApiError> {
    let length = shape.length.unwrap_or(config.terrain_length);
    let grid_m = shape.grid_m.unwrap_or(config.terrain_grid_m);
    let max_height_m = shape.max_height_m.unwrap_or(config.terrain_max_height_m);

    if length > config.max_samples {
        return Err(ApiError::TooManySamples {
            count: length,
            limit: config.max_samples,
        });
    }
    check_grid(grid_m)?;

    let terrain = match shape.seed {
        Some(seed) => {
            TerrainProfile::generate(length, grid_m, max_height_m, &mut StdRng::seed_from_u64(seed))
        }
        None => TerrainProfile::generate(length, grid_m, max_height_m, &mut rand::rng()),
    };
    Ok(terrain)
}

/// Generate random terrain without storing it.
pub async fn generate_terrain(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<TerrainProfile>, ApiError> {
    let terrain = build_terrain(state.config(), &req)?;
    Ok(Json(terrain))
}

/// Create a stored terrain: flat, generated, or from explicit values.
pub async fn create_terrain(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTerrainRequest>,
) -> Result<(StatusCode, Json<StoredTerrain>), ApiError> {
    let config = state.config();
    let grid_m = req.shape.grid_m.unwrap_or(config.terrain_grid_m);
    let max_height_m = req.shape.max_height_m.unwrap_or(config.terrain_max_height_m);
    check_grid(grid_m)?;

    let terrain = if let Some(values) = req.values {
        if values.len() > config.max_samples {
            return Err(ApiError::TooManySamples {
                count: values.len(),
                limit: config.max_samples,
            });
        }
        TerrainProfile::from_values(values, grid_m, max_height_m)
    } else if req.generate {
        build_terrain(config, &req.shape)?
    } else {
        let length = req.shape.length.unwrap_or(config.terrain_length);
        if length > config.max_samples {
            return Err(ApiError::TooManySamples {
                count: length,
                limit: config.max_samples,
            });
        }
        TerrainProfile::new(length, grid_m, max_height_m)
    };

    let stored = state.insert_terrain(terrain);
    tracing::info!("Created terrain {} ({} samples)", stored.id, stored.terrain.len());
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn list_terrains(State(state): State<Arc<AppState>>) -> Json<Vec<TerrainSummary>> {
    Json(state.list_terrains())
}

pub async fn get_terrain(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StoredTerrain>, ApiError> {
    state
        .get_terrain(&id)
        .map(Json)
        .ok_or(ApiError::TerrainNotFound(id))
}

pub async fn delete_terrain(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    if state.remove_terrain(&id) {
        tracing::info!("Deleted terrain {}", id);
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Set one sample, or a ramp when `from_index` is given.
pub async fn edit_terrain(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<EditTerrainRequest>,
) -> Result<Json<StoredTerrain>, ApiError> {
    if !req.height_m.is_finite() {
        return Err(ApiError::BadRequest("height_m must be finite".to_string()));
    }

    let (changed, stored) = state
        .edit_terrain(&id, |terrain| match req.from_index {
            Some(from) => terrain.set_ramp(from, req.index, req.height_m),
            None => terrain.set_value(req.index, req.height_m),
        })
        .ok_or_else(|| ApiError::TerrainNotFound(id.clone()))?;

    if !changed {
        return Err(ApiError::BadRequest(format!(
            "index out of range for terrain of {} samples",
            stored.terrain.len()
        )));
    }
    Ok(Json(stored))
}

/// Resample a stored terrain at the profile step and build its profile.
pub async fn terrain_profile(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(req): Json<TerrainProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let stored = state
        .get_terrain(&id)
        .ok_or_else(|| ApiError::TerrainNotFound(id.clone()))?;
    let config = req.config.unwrap_or(state.config().default_profile);
    let mode = req.resample.unwrap_or(state.config().resample_mode);

    let limit = state.config().max_samples;
    let count = stored.terrain.resampled_len(config.step_m)?;
    if count > limit {
        return Err(ApiError::TooManySamples { count, limit });
    }
    let samples = stored.terrain.resample(config.step_m, mode)?;

    let span = request_id.profile_span(Some(&id));
    span.in_scope(|| {
        tracing::debug!(
            native = stored.terrain.len(),
            resampled = samples.len(),
            mode = ?mode,
            "resampled terrain"
        )
    });

    let response = run_profile(&state, span, samples, req.waypoints, config).await?;
    Ok(Json(response))
}
