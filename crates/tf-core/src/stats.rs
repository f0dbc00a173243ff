//! Break point detection and clearance statistics.

use crate::models::{Corridor, ProfileStats};

/// Second-difference magnitude above which a sample counts as a slope change.
pub const SLOPE_BREAK_EPSILON: f64 = 1e-3;

/// Mark the ends and every index where the path bends.
pub fn detect_slope_breaks(path: &[f64]) -> Vec<bool> {
    let n = path.len();
    (0..n)
        .map(|i| {
            i == 0
                || i + 1 == n
                || (2.0 * path[i] - path[i - 1] - path[i + 1]).abs() > SLOPE_BREAK_EPSILON
        })
        .collect()
}

/// Caller waypoints with both ends forced on.
pub fn normalize_mandatory(flags: &[bool]) -> Vec<bool> {
    let n = flags.len();
    flags
        .iter()
        .enumerate()
        .map(|(i, flag)| *flag || i == 0 || i + 1 == n)
        .collect()
}

pub fn merge_control_points(slope_breaks: &[bool], mandatory: &[bool]) -> Vec<bool> {
    slope_breaks
        .iter()
        .zip(mandatory)
        .map(|(slope, required)| *slope || *required)
        .collect()
}

pub fn inside_limits(path: &[f64], corridor: &Corridor) -> Vec<bool> {
    path.iter()
        .enumerate()
        .map(|(i, value)| corridor.contains(i, *value))
        .collect()
}

/// Compute occupancy and height-above-terrain figures.
///
/// `path`, `samples` and `inside` must be non-empty and of equal length.
pub fn compute_stats(path: &[f64], samples: &[f64], inside: &[bool]) -> ProfileStats {
    let n = path.len() as f64;
    let inside_count = inside.iter().filter(|v| **v).count();

    let mut sum = 0.0;
    let mut min_height = f64::INFINITY;
    let mut max_height = f64::NEG_INFINITY;
    for (altitude, ground) in path.iter().zip(samples) {
        let height = altitude - ground;
        sum += height;
        min_height = min_height.min(height);
        max_height = max_height.max(height);
    }

    ProfileStats {
        inside_pct: 100.0 * inside_count as f64 / n,
        average_height_m: sum / n,
        min_height_m: min_height,
        max_height_m: max_height,
    }
}
