//! Human-readable profile report.

use serde::Serialize;
use std::fmt::Write;
use tf_core::{ProfileCheck, ProfileConfig, ProfileResult, ProfileVertex};

/// Everything `tf-profile --json` prints.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    pub ok: bool,
    pub config: ProfileConfig,
    pub samples: Vec<f64>,
    #[serde(flatten)]
    pub result: ProfileResult,
    pub vertices: Vec<ProfileVertex>,
    pub check: ProfileCheck,
}

impl ProfileReport {
    pub fn new(config: ProfileConfig, samples: Vec<f64>, result: ProfileResult, check: ProfileCheck) -> Self {
        let vertices = result.vertices(config.step_m, &samples);
        Self {
            ok: check.is_valid(),
            config,
            samples,
            result,
            vertices,
            check,
        }
    }
}

/// Stats rounded to whole units, plan verdict, then one line per vertex.
pub fn format_report(report: &ProfileReport) -> String {
    let stats = &report.result.stats;
    let mut out = String::new();

    let _ = writeln!(out, "Samples:          {}", report.samples.len());
    let _ = writeln!(out, "Inside corridor:  {} %", stats.inside_pct.round());
    let _ = writeln!(out, "Average height:   {} m", stats.average_height_m.round());
    let _ = writeln!(out, "Min height:       {} m", stats.min_height_m.round());
    let _ = writeln!(out, "Max height:       {} m", stats.max_height_m.round());
    let _ = writeln!(out, "Plan:             {}", if report.ok { "OK" } else { "ERROR" });
    for violation in &report.check.violations {
        let _ = writeln!(out, "  ! {}", violation.message);
    }

    let _ = writeln!(out, "Vertices ({}):", report.vertices.len());
    for vertex in &report.vertices {
        let _ = writeln!(
            out,
            "  {:>5}  {:>9.1} m  alt {:>8.1} m  terrain {:>8.1} m{}",
            vertex.index,
            vertex.distance_m,
            vertex.altitude_m,
            vertex.terrain_m,
            if vertex.mandatory { "  *" } else { "" }
        );
    }
    out
}
