//! Profile computation endpoints.

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tf_core::{
    build_profile, check_profile, ProfileCheck, ProfileConfig, ProfileResult, ProfileVertex,
};

use crate::api::request_id::RequestId;
use crate::api::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRequest {
    pub samples: Vec<f64>,
    /// Mandatory waypoint flags; only the ends are mandatory when omitted
    #[serde(default)]
    pub waypoints: Option<Vec<bool>>,
    #[serde(default)]
    pub config: Option<ProfileConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// Whether the sparse plan passes the clearance and rate check
    pub ok: bool,
    pub config: ProfileConfig,
    pub samples: Vec<f64>,
    #[serde(flatten)]
    pub result: ProfileResult,
    pub vertices: Vec<ProfileVertex>,
    pub check: ProfileCheck,
    pub computed_at: DateTime<Utc>,
}

pub async fn compute_profile(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let config = req.config.unwrap_or(state.config().default_profile);
    let span = request_id.profile_span(None);
    let response = run_profile(&state, span, req.samples, req.waypoints, config).await?;
    Ok(Json(response))
}

/// Build and check a profile off the async runtime, inside `span`.
pub async fn run_profile(
    state: &AppState,
    span: tracing::Span,
    samples: Vec<f64>,
    waypoints: Option<Vec<bool>>,
    config: ProfileConfig,
) -> Result<ProfileResponse, ApiError> {
    let limit = state.config().max_samples;
    if samples.len() > limit {
        return Err(ApiError::TooManySamples {
            count: samples.len(),
            limit,
        });
    }

    let waypoints = waypoints.unwrap_or_else(|| vec![false; samples.len()]);
    span.in_scope(|| tracing::debug!(samples = samples.len(), "computing profile"));

    tokio::task::spawn_blocking(move || -> Result<ProfileResponse, ApiError> {
        let _entered = span.enter();
        let result = build_profile(&samples, &waypoints, &config)?;
        let check = check_profile(&result, &samples, &config);
        let vertices = result.vertices(config.step_m, &samples);
        tracing::info!(
            samples = samples.len(),
            vertices = vertices.len(),
            inside_pct = result.stats.inside_pct,
            valid = check.is_valid(),
            "profile computed"
        );
        Ok(ProfileResponse {
            ok: check.is_valid(),
            config,
            samples,
            result,
            vertices,
            check,
            computed_at: Utc::now(),
        })
    })
    .await
    .map_err(|err| ApiError::Internal(err.to_string()))?
}
