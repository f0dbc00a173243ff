//! Envelope constructor: the first, always-feasible profile.
//!
//! Starts from a path far below every floor and repeatedly pins the worst
//! violator onto its floor, clamping neighbours outward until the gradient
//! envelope holds again. Values only ever rise, so every pinned index stays
//! feasible and at most one round per sample is needed.

use crate::error::ProfileError;
use crate::models::{Corridor, GradientEnvelope};

/// Distance of the starting path below the lowest floor.
const INITIAL_DEPTH_M: f64 = 1e6;

enum RepairStep {
    Pinned(usize),
    Settled,
}

/// Build a floor-feasible, gradient-feasible path.
pub fn construct_envelope_path(
    corridor: &Corridor,
    gradient: &GradientEnvelope,
) -> Result<Vec<f64>, ProfileError> {
    let n = corridor.len();
    let lowest = corridor.floor.iter().copied().fold(f64::INFINITY, f64::min);
    let mut path = vec![lowest - INITIAL_DEPTH_M; n];

    for round in 0..=n {
        match repair_worst(&mut path, corridor, gradient) {
            RepairStep::Settled => {
                tracing::debug!(rounds = round, samples = n, "envelope path settled");
                return Ok(path);
            }
            RepairStep::Pinned(index) => {
                tracing::trace!(round, index, "pinned floor violation");
            }
        }
    }

    Err(ProfileError::UnreachableCorridor { rounds: n + 1 })
}

fn repair_worst(path: &mut [f64], corridor: &Corridor, gradient: &GradientEnvelope) -> RepairStep {
    let Some(index) = worst_violation(path, &corridor.floor) else {
        return RepairStep::Settled;
    };

    path[index] = corridor.floor[index];
    propagate_left(path, index, gradient);
    propagate_right(path, index, gradient);
    RepairStep::Pinned(index)
}

/// Index with the most negative slack, first occurrence on ties.
fn worst_violation(path: &[f64], floor: &[f64]) -> Option<usize> {
    let mut worst: Option<(usize, f64)> = None;
    for (i, (value, floor)) in path.iter().zip(floor).enumerate() {
        let slack = value - floor;
        if slack >= 0.0 {
            continue;
        }
        match worst {
            Some((_, min)) if slack >= min => {}
            _ => worst = Some((i, slack)),
        }
    }
    worst.map(|(i, _)| i)
}

fn propagate_left(path: &mut [f64], index: usize, gradient: &GradientEnvelope) {
    for i in (0..index).rev() {
        let diff = path[i + 1] - path[i];
        if diff > gradient.delta_up {
            path[i] = path[i + 1] - gradient.delta_up;
        } else if diff < gradient.delta_down {
            path[i] = path[i + 1] - gradient.delta_down;
        } else {
            break;
        }
    }
}

fn propagate_right(path: &mut [f64], index: usize, gradient: &GradientEnvelope) {
    for i in index + 1..path.len() {
        let diff = path[i] - path[i - 1];
        if diff > gradient.delta_up {
            path[i] = path[i - 1] + gradient.delta_up;
        } else if diff < gradient.delta_down {
            path[i] = path[i - 1] + gradient.delta_down;
        } else {
            break;
        }
    }
}
