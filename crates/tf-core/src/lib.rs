//! Terrain-following vertical profile synthesis.
//!
//! Given ground elevations sampled along a route and a vehicle's vertical
//! performance, builds an altitude-vs-distance path that never drops below the
//! clearance floor, stays inside the tolerance corridor where it can, respects
//! climb/descent limits, and uses as few straight segments as possible.

pub mod envelope;
pub mod error;
pub mod models;
pub mod optimize;
pub mod profile;
pub mod stats;
pub mod terrain;
pub mod validation;

pub use error::ProfileError;
pub use models::{
    Corridor, GradientEnvelope, ProfileConfig, ProfileResult, ProfileStats, ProfileVertex,
    VehicleEnvelope,
};
pub use profile::build_profile;
pub use terrain::{check_grid, ResampleMode, TerrainProfile};
pub use validation::{check_profile, ProfileCheck, ProfileViolation, ViolationKind};
