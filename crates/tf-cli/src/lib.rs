//! Terrain-following CLI support.
//!
//! The `tf-profile` binary reads or generates an elevation trace, builds the
//! vertical profile and prints either a short report or the full JSON result.

pub mod input;
pub mod report;

pub use input::{generate_terrain, load_terrain, parse_samples};
pub use report::{format_report, ProfileReport};
