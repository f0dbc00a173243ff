//! Independent check of a finished profile against the vehicle envelope.
//!
//! Looks only at what a flight plan would contain: the control points and the
//! straight legs between them.

use serde::{Deserialize, Serialize};

use crate::models::{ProfileConfig, ProfileResult};

/// Slack allowed on vertical speed comparisons.
const RATE_TOLERANCE_MPS: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Path dips below terrain plus follow height
    BelowFloor,
    /// Leg climbs faster than the vehicle can
    ClimbRate,
    /// Leg descends faster than the vehicle can
    DescentRate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileViolation {
    pub kind: ViolationKind,
    pub from_index: usize,
    pub to_index: usize,
    /// Clearance deficit in meters or vertical speed in m/s, depending on kind
    pub value: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileCheck {
    pub floor_ok: bool,
    pub rate_ok: bool,
    pub violations: Vec<ProfileViolation>,
}

impl ProfileCheck {
    pub fn is_valid(&self) -> bool {
        self.floor_ok && self.rate_ok
    }
}

/// Verify clearance on every sample and vertical speed on every leg.
pub fn check_profile(result: &ProfileResult, samples: &[f64], config: &ProfileConfig) -> ProfileCheck {
    let env = &config.envelope;
    let mut violations = Vec::new();

    for (i, (altitude, ground)) in result.path.iter().zip(samples).enumerate() {
        let floor = ground + env.follow_height_m;
        if *altitude < floor {
            violations.push(ProfileViolation {
                kind: ViolationKind::BelowFloor,
                from_index: i,
                to_index: i,
                value: floor - altitude,
                message: format!(
                    "Altitude {:.1}m is {:.2}m below the floor at sample {}",
                    altitude,
                    floor - altitude,
                    i
                ),
            });
        }
    }
    let floor_violations = violations.len();
    let floor_ok = floor_violations == 0;

    let mut previous: Option<usize> = None;
    for (i, is_control) in result.control_points.iter().enumerate() {
        if !*is_control {
            continue;
        }
        if let Some(from) = previous {
            let distance_m = (i - from) as f64 * config.step_m;
            let vz = (result.path[i] - result.path[from]) / distance_m * env.speed_mps;
            if vz > env.max_climb_rate_mps + RATE_TOLERANCE_MPS {
                violations.push(ProfileViolation {
                    kind: ViolationKind::ClimbRate,
                    from_index: from,
                    to_index: i,
                    value: vz,
                    message: format!(
                        "Climb {:.2}m/s exceeds max {:.2}m/s",
                        vz, env.max_climb_rate_mps
                    ),
                });
            } else if vz < env.min_climb_rate_mps - RATE_TOLERANCE_MPS {
                violations.push(ProfileViolation {
                    kind: ViolationKind::DescentRate,
                    from_index: from,
                    to_index: i,
                    value: vz,
                    message: format!(
                        "Descent {:.2}m/s exceeds max {:.2}m/s",
                        vz, env.min_climb_rate_mps
                    ),
                });
            }
        }
        previous = Some(i);
    }
    let rate_ok = violations.len() == floor_violations;

    ProfileCheck {
        floor_ok,
        rate_ok,
        violations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_profile;

    #[test]
    fn built_profiles_pass_the_check() {
        let samples = [0.0, 40.0, 120.0, 60.0, 0.0, 10.0, 0.0];
        let config = ProfileConfig::default();
        let result = build_profile(&samples, &[false; 7], &config).unwrap();
        let check = check_profile(&result, &samples, &config);
        assert!(check.is_valid(), "{:?}", check.violations);
    }

    #[test]
    fn steep_leg_is_reported() {
        let samples = [0.0; 3];
        let config = ProfileConfig::default();
        let mut result = build_profile(&samples, &[false; 3], &config).unwrap();
        result.path[2] = 200.0;

        let check = check_profile(&result, &samples, &config);
        assert!(check.floor_ok);
        assert!(!check.rate_ok);
        assert_eq!(check.violations[0].kind, ViolationKind::ClimbRate);
        assert_eq!((check.violations[0].from_index, check.violations[0].to_index), (0, 2));
    }

    #[test]
    fn dip_below_floor_is_reported() {
        let samples = [0.0; 3];
        let config = ProfileConfig::default();
        let mut result = build_profile(&samples, &[false; 3], &config).unwrap();
        result.path[1] = 60.0;

        let check = check_profile(&result, &samples, &config);
        assert!(!check.floor_ok);
        assert!(check.rate_ok);
        assert_eq!(check.violations.len(), 1);
        assert_eq!(check.violations[0].kind, ViolationKind::BelowFloor);
        assert!((check.violations[0].value - 10.0).abs() < 1e-12);
    }
}
