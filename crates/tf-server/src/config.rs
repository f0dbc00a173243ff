//! Server configuration from environment.

use std::env;
use std::str::FromStr;

use tf_core::{ProfileConfig, ResampleMode, VehicleEnvelope};

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Largest elevation trace accepted by the profile endpoints
    pub max_samples: usize,
    /// Native sample count of newly created terrains
    pub terrain_length: usize,
    pub terrain_grid_m: f64,
    pub terrain_max_height_m: f64,
    /// Used when a request carries no config of its own
    pub default_profile: ProfileConfig,
    pub resample_mode: ResampleMode,
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = ProfileConfig::default();
        let envelope = defaults.envelope;
        Self {
            server_port: env_or("TF_PORT", 3000),
            max_samples: env_or("TF_MAX_SAMPLES", 20_000),
            terrain_length: env_or("TF_TERRAIN_LENGTH", 1000),
            terrain_grid_m: env_or("TF_TERRAIN_GRID_M", 10.0),
            terrain_max_height_m: env_or("TF_TERRAIN_MAX_HEIGHT_M", 500.0),
            default_profile: ProfileConfig {
                step_m: env_or("TF_STEP_M", defaults.step_m),
                envelope: VehicleEnvelope {
                    speed_mps: env_or("TF_SPEED_MPS", envelope.speed_mps),
                    max_climb_rate_mps: env_or("TF_MAX_VZ_MPS", envelope.max_climb_rate_mps),
                    min_climb_rate_mps: env_or("TF_MIN_VZ_MPS", envelope.min_climb_rate_mps),
                    follow_height_m: env_or("TF_FOLLOW_HEIGHT_M", envelope.follow_height_m),
                    tolerance_m: env_or("TF_TOLERANCE_M", envelope.tolerance_m),
                },
            },
            resample_mode: env::var("TF_RESAMPLE")
                .ok()
                .and_then(|s| ResampleMode::parse(&s))
                .unwrap_or_default(),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
