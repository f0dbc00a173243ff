//! Terrain-following profile pipeline.

use crate::envelope::construct_envelope_path;
use crate::error::ProfileError;
use crate::models::{Corridor, ProfileConfig, ProfileResult};
use crate::optimize::optimize_path;
use crate::stats::{
    compute_stats, detect_slope_breaks, inside_limits, merge_control_points, normalize_mandatory,
};

/// Build an altitude profile over `samples`.
///
/// `mandatory` marks waypoints that must survive as vertices of the output;
/// the first and last index are always treated as mandatory. Neither input is
/// modified.
pub fn build_profile(
    samples: &[f64],
    mandatory: &[bool],
    config: &ProfileConfig,
) -> Result<ProfileResult, ProfileError> {
    config.validate()?;
    validate_input(samples, mandatory)?;

    let gradient = config.gradient();
    let corridor = Corridor::new(samples, &config.envelope);

    let unoptimized_path = construct_envelope_path(&corridor, &gradient)?;
    let path = optimize_path(&unoptimized_path, &corridor, &gradient);

    let slope_breaks = detect_slope_breaks(&path);
    let mandatory = normalize_mandatory(mandatory);
    let control_points = merge_control_points(&slope_breaks, &mandatory);
    let inside = inside_limits(&path, &corridor);
    let stats = compute_stats(&path, samples, &inside);

    tracing::debug!(
        samples = samples.len(),
        control_points = control_points.iter().filter(|c| **c).count(),
        inside_pct = stats.inside_pct,
        "profile built"
    );

    Ok(ProfileResult {
        path,
        unoptimized_path,
        slope_breaks,
        mandatory,
        control_points,
        inside_limits: inside,
        stats,
    })
}

fn validate_input(samples: &[f64], mandatory: &[bool]) -> Result<(), ProfileError> {
    if samples.len() < 2 {
        return Err(ProfileError::InvalidInput(format!(
            "need at least 2 elevation samples, got {}",
            samples.len()
        )));
    }
    if samples.len() != mandatory.len() {
        return Err(ProfileError::InvalidInput(format!(
            "{} elevation samples but {} waypoint flags",
            samples.len(),
            mandatory.len()
        )));
    }
    if let Some(index) = samples.iter().position(|h| !h.is_finite()) {
        return Err(ProfileError::InvalidInput(format!(
            "elevation sample {} is not finite",
            index
        )));
    }
    Ok(())
}
