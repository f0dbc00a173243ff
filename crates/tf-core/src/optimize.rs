//! Segment reduction over a feasible path.
//!
//! Both passes only ever replace runs of the path with straight lines whose
//! slopes fit the gradient envelope, so floor and gradient feasibility
//! established by the envelope constructor are preserved.

use crate::models::{Corridor, GradientEnvelope};

/// Run forward extension followed by chord reduction on a copy of `path`.
pub fn optimize_path(path: &[f64], corridor: &Corridor, gradient: &GradientEnvelope) -> Vec<f64> {
    let extended = extend_forward(path, corridor, gradient);
    reduce_chords(&extended, corridor, gradient)
}

/// Pass 1: keep the previous slope going while it stays between the current
/// path and the ceiling, then rejoin the old path at the first index reachable
/// with a flyable slope.
pub fn extend_forward(path: &[f64], corridor: &Corridor, gradient: &GradientEnvelope) -> Vec<f64> {
    let mut path = path.to_vec();
    let n = path.len();
    if n < 3 {
        return path;
    }

    let mut prev_diff = path[1] - path[0];
    let mut extensions = 0usize;

    for i in 2..n - 1 {
        let candidate = path[i - 1] + prev_diff;
        let in_limit = candidate >= path[i] && candidate <= corridor.ceiling[i];

        let rejoin = if in_limit {
            (i + 1..n)
                .map(|tail| (tail, (path[tail] - candidate) / (tail - i) as f64))
                .find(|(_, slope)| gradient.contains(*slope))
        } else {
            None
        };

        match rejoin {
            Some((tail, slope)) => {
                for j in i..tail {
                    path[j] = candidate + (j - i) as f64 * slope;
                }
                extensions += 1;
            }
            None => prev_diff = path[i] - path[i - 1],
        }
    }

    tracing::debug!(extensions, "forward extension pass complete");
    path
}

/// Pass 2: from each anchor, replace the run up to the farthest index whose
/// chord is flyable and keeps every interior point inside the corridor.
///
/// One sweep is not a fixed point: straightening a later run can open a
/// longer chord from an earlier anchor, so running the pass again may still
/// remove vertices.
pub fn reduce_chords(path: &[f64], corridor: &Corridor, gradient: &GradientEnvelope) -> Vec<f64> {
    let mut path = path.to_vec();
    let n = path.len();
    let mut from = 0usize;
    let mut chords = 0usize;

    while from + 1 < n {
        match longest_chord(&path, from, corridor, gradient) {
            Some(to) => {
                let slope = (path[to] - path[from]) / (to - from) as f64;
                for i in from + 1..to {
                    path[i] = path[from] + (i - from) as f64 * slope;
                }
                chords += 1;
                from = to;
            }
            None => from += 1,
        }
    }

    tracing::debug!(chords, "chord reduction pass complete");
    path
}

/// Farthest `to >= from + 2` whose chord from `from` is acceptable.
///
/// Acceptance is not monotone in `to`, so every candidate is tried from the
/// far end down.
fn longest_chord(
    path: &[f64],
    from: usize,
    corridor: &Corridor,
    gradient: &GradientEnvelope,
) -> Option<usize> {
    let n = path.len();
    (from + 2..n).rev().find(|&to| {
        let slope = (path[to] - path[from]) / (to - from) as f64;
        gradient.contains(slope)
            && (from + 1..to)
                .all(|i| corridor.contains(i, path[from] + (i - from) as f64 * slope))
    })
}
