//! Core data models for terrain-following profiles.

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// Vertical performance and clearance limits of the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleEnvelope {
    /// Ground speed (true airspeed plus forecast wind) in m/s
    pub speed_mps: f64,
    /// Maximum climb rate in m/s
    pub max_climb_rate_mps: f64,
    /// Maximum descent rate in m/s, zero or negative
    pub min_climb_rate_mps: f64,
    /// Clearance above terrain that the path must never go below
    pub follow_height_m: f64,
    /// Allowed excursion above the follow height
    pub tolerance_m: f64,
}

impl Default for VehicleEnvelope {
    fn default() -> Self {
        Self {
            speed_mps: 26.0,
            max_climb_rate_mps: 2.0,
            min_climb_rate_mps: -3.0,
            follow_height_m: 70.0,
            tolerance_m: 5.0,
        }
    }
}

/// Everything the profile builder needs besides the samples themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Horizontal distance between consecutive elevation samples
    pub step_m: f64,
    #[serde(flatten)]
    pub envelope: VehicleEnvelope,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            step_m: 100.0,
            envelope: VehicleEnvelope::default(),
        }
    }
}

impl ProfileConfig {
    /// Reject envelopes that would make the corridor or gradient meaningless.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let env = &self.envelope;
        let fields = [
            ("step_m", self.step_m),
            ("speed_mps", env.speed_mps),
            ("max_climb_rate_mps", env.max_climb_rate_mps),
            ("min_climb_rate_mps", env.min_climb_rate_mps),
            ("follow_height_m", env.follow_height_m),
            ("tolerance_m", env.tolerance_m),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(invalid(format!("{} must be finite", name)));
        }

        if env.speed_mps <= 0.0 {
            return Err(invalid(format!("speed_mps must be > 0, got {}", env.speed_mps)));
        }
        if self.step_m <= 0.0 {
            return Err(invalid(format!("step_m must be > 0, got {}", self.step_m)));
        }
        if env.tolerance_m < 0.0 {
            return Err(invalid(format!(
                "tolerance_m must be >= 0, got {}",
                env.tolerance_m
            )));
        }
        if env.follow_height_m < 0.0 {
            return Err(invalid(format!(
                "follow_height_m must be >= 0, got {}",
                env.follow_height_m
            )));
        }
        if env.max_climb_rate_mps < 0.0 {
            return Err(invalid(format!(
                "max_climb_rate_mps must be >= 0, got {}",
                env.max_climb_rate_mps
            )));
        }
        if env.min_climb_rate_mps > 0.0 {
            return Err(invalid(format!(
                "min_climb_rate_mps must be <= 0, got {}",
                env.min_climb_rate_mps
            )));
        }
        Ok(())
    }

    pub fn gradient(&self) -> GradientEnvelope {
        GradientEnvelope::new(&self.envelope, self.step_m)
    }
}

fn invalid(message: String) -> ProfileError {
    ProfileError::InvalidConfiguration(message)
}

/// Per-step altitude change limits derived from the vehicle envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientEnvelope {
    /// Largest allowed rise between adjacent samples (>= 0)
    pub delta_up: f64,
    /// Largest allowed fall between adjacent samples (<= 0)
    pub delta_down: f64,
}

impl GradientEnvelope {
    pub fn new(envelope: &VehicleEnvelope, step_m: f64) -> Self {
        Self {
            delta_up: envelope.max_climb_rate_mps / envelope.speed_mps * step_m,
            delta_down: envelope.min_climb_rate_mps / envelope.speed_mps * step_m,
        }
    }

    /// Whether a per-step slope is flyable.
    pub fn contains(&self, slope: f64) -> bool {
        slope >= self.delta_down && slope <= self.delta_up
    }
}

/// The `[floor, ceiling]` band at every sample index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corridor {
    pub floor: Vec<f64>,
    pub ceiling: Vec<f64>,
}

impl Corridor {
    pub fn new(samples: &[f64], envelope: &VehicleEnvelope) -> Self {
        let floor: Vec<f64> = samples
            .iter()
            .map(|h| h + envelope.follow_height_m)
            .collect();
        let ceiling = floor.iter().map(|f| f + envelope.tolerance_m).collect();
        Self { floor, ceiling }
    }

    pub fn len(&self) -> usize {
        self.floor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floor.is_empty()
    }

    pub fn contains(&self, index: usize, value: f64) -> bool {
        value >= self.floor[index] && value <= self.ceiling[index]
    }
}

/// Clearance statistics of a finished profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileStats {
    /// Percentage of samples whose altitude lies inside the corridor
    pub inside_pct: f64,
    pub average_height_m: f64,
    /// Should equal the follow height for any non-trivial terrain
    pub min_height_m: f64,
    pub max_height_m: f64,
}

/// One vertex of the sparse flight plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileVertex {
    pub index: usize,
    pub distance_m: f64,
    pub altitude_m: f64,
    pub terrain_m: f64,
    /// True when the caller required this point, false when the optimizer introduced it
    pub mandatory: bool,
}

/// Output of [`crate::build_profile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResult {
    /// Optimized altitude at every sample index
    pub path: Vec<f64>,
    /// Envelope constructor output before segment reduction
    pub unoptimized_path: Vec<f64>,
    /// Indices where the optimized path changes slope
    pub slope_breaks: Vec<bool>,
    /// Caller waypoints, with both ends always set
    pub mandatory: Vec<bool>,
    /// `slope_breaks | mandatory`
    pub control_points: Vec<bool>,
    pub inside_limits: Vec<bool>,
    pub stats: ProfileStats,
}

impl ProfileResult {
    pub fn control_point_count(&self) -> usize {
        self.control_points.iter().filter(|c| **c).count()
    }

    /// Number of straight segments in the sparse plan.
    pub fn segment_count(&self) -> usize {
        self.control_point_count().saturating_sub(1)
    }

    /// Collapse the dense path to its control points.
    pub fn vertices(&self, step_m: f64, samples: &[f64]) -> Vec<ProfileVertex> {
        self.control_points
            .iter()
            .enumerate()
            .filter(|(_, is_control)| **is_control)
            .map(|(index, _)| ProfileVertex {
                index,
                distance_m: index as f64 * step_m,
                altitude_m: self.path[index],
                terrain_m: samples.get(index).copied().unwrap_or(0.0),
                mandatory: self.mandatory[index],
            })
            .collect()
    }
}
