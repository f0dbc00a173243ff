//! Editable terrain sample storage.
//!
//! Holds heights on a fixed native grid and produces the coarser, evenly
//! stepped elevation traces the profile builder consumes.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::ProfileError;

const GENERATED_HARMONICS: usize = 100;
const GENERATED_MIN_FREQ: f64 = 0.01;
const GENERATED_FREQ_SPAN: f64 = 50.0;
/// Mean generated height as a fraction of the display height
const GENERATED_AMPLITUDE_RATIO: f64 = 0.2;

/// How native samples are picked when resampling to another step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleMode {
    /// Take the sample at the start of each window
    #[default]
    Nearest,
    /// Take the highest sample in each window; same as `Nearest` when upsampling
    Peak,
}

impl ResampleMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "nearest" | "floor" => Some(Self::Nearest),
            "peak" | "max" => Some(Self::Peak),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainProfile {
    /// Native distance between samples in meters
    pub grid_m: f64,
    /// Upper bound used for display scaling and generation
    pub max_height_m: f64,
    values: Vec<f64>,
}

impl TerrainProfile {
    /// Flat terrain of `length` samples.
    pub fn new(length: usize, grid_m: f64, max_height_m: f64) -> Self {
        Self {
            grid_m,
            max_height_m,
            values: vec![0.0; length],
        }
    }

    pub fn from_values(values: Vec<f64>, grid_m: f64, max_height_m: f64) -> Self {
        Self {
            grid_m,
            max_height_m,
            values,
        }
    }

    /// Random rolling terrain built from a sum of sinusoids.
    pub fn generate<R: Rng>(
        length: usize,
        grid_m: f64,
        max_height_m: f64,
        rng: &mut R,
    ) -> Self {
        let mut terrain = Self::new(length, grid_m, max_height_m);
        if length == 0 {
            return terrain;
        }

        let max_freq = (2.0 * PI / length as f64) * GENERATED_FREQ_SPAN;
        let amplitude = max_height_m * GENERATED_AMPLITUDE_RATIO;

        let harmonics: Vec<(f64, f64, f64)> = (0..GENERATED_HARMONICS)
            .map(|_| {
                let r: f64 = rng.random();
                let r = r.powi(5);
                let freq = GENERATED_MIN_FREQ.max(r * max_freq);
                let phase = rng.random::<f64>() * 2.0 * PI;
                let weight = rng.random::<f64>() * (1.0 - r.powf(0.03));
                (freq, phase, weight)
            })
            .collect();

        for (i, value) in terrain.values.iter_mut().enumerate() {
            let x = i as f64;
            let sum: f64 = harmonics
                .iter()
                .map(|(freq, phase, weight)| weight * (freq * x + phase).sin())
                .sum();
            *value = (amplitude * (sum + 1.0)).max(0.0);
        }
        terrain
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn distance_m(&self) -> f64 {
        self.values.len() as f64 * self.grid_m
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Set one sample. Out-of-range indices are ignored.
    pub fn set_value(&mut self, index: usize, height_m: f64) -> bool {
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = height_m;
                true
            }
            None => false,
        }
    }

    /// Set `to_index` and fill the samples between it and `from_index` linearly.
    ///
    /// Nothing is written unless both indices are in range.
    pub fn set_ramp(&mut self, from_index: usize, to_index: usize, to_height_m: f64) -> bool {
        let len = self.values.len();
        if from_index >= len || to_index >= len {
            return false;
        }
        self.values[to_index] = to_height_m;

        let lo = from_index.min(to_index);
        let hi = from_index.max(to_index);
        let lo_h = self.values[lo];
        let hi_h = self.values[hi];
        let span = (hi - lo) as f64;
        for i in lo + 1..hi {
            self.values[i] = lo_h + (hi_h - lo_h) / span * (i - lo) as f64;
        }
        true
    }

    /// Number of samples [`resample`](Self::resample) yields at `step_m`.
    pub fn resampled_len(&self, step_m: f64) -> Result<usize, ProfileError> {
        let ratio = self.step_ratio(step_m)?;
        Ok((self.values.len() as f64 / ratio).ceil() as usize)
    }

    /// Elevation trace at `step_m` spacing.
    ///
    /// Walks the fractional native index `k * step_m / grid_m` while it is in
    /// range, so a step finer than the grid repeats samples.
    pub fn resample(&self, step_m: f64, mode: ResampleMode) -> Result<Vec<f64>, ProfileError> {
        let ratio = self.step_ratio(step_m)?;
        let len = self.values.len();
        let mut out = Vec::with_capacity((len as f64 / ratio).ceil() as usize);
        let mut k = 0usize;
        loop {
            let index = k as f64 * ratio;
            if index >= len as f64 {
                break;
            }
            let start = index.floor() as usize;
            let value = match mode {
                ResampleMode::Nearest => self.values[start],
                ResampleMode::Peak => {
                    let end = ((index + ratio).floor() as usize).clamp(start + 1, len);
                    self.values[start..end]
                        .iter()
                        .copied()
                        .fold(f64::NEG_INFINITY, f64::max)
                }
            };
            out.push(value);
            k += 1;
        }
        Ok(out)
    }

    fn step_ratio(&self, step_m: f64) -> Result<f64, ProfileError> {
        check_grid(self.grid_m)?;
        if !(step_m.is_finite() && step_m > 0.0) {
            return Err(ProfileError::InvalidConfiguration(format!(
                "step_m must be a positive finite number, got {}",
                step_m
            )));
        }
        Ok(step_m / self.grid_m)
    }
}

/// Reject a native grid spacing that is not a positive finite distance.
pub fn check_grid(grid_m: f64) -> Result<(), ProfileError> {
    if grid_m.is_finite() && grid_m > 0.0 {
        Ok(())
    } else {
        Err(ProfileError::InvalidInput(format!(
            "grid_m must be a positive finite number, got {}",
            grid_m
        )))
    }
}
