//! Elevation trace input.

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tf_core::{check_grid, TerrainProfile};

/// Parse an elevation trace.
///
/// Accepts either a JSON array of numbers or plain text with one or more
/// numbers per line separated by whitespace or commas. Blank lines and lines
/// starting with `#` are skipped.
pub fn parse_samples(text: &str) -> Result<Vec<f64>> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        let samples: Vec<f64> =
            serde_json::from_str(trimmed).context("invalid JSON elevation array")?;
        return Ok(samples);
    }

    let mut samples = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        for token in line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            let value: f64 = token
                .parse()
                .with_context(|| format!("line {}: '{}' is not a number", line_no + 1, token))?;
            if !value.is_finite() {
                bail!("line {}: elevation must be finite", line_no + 1);
            }
            samples.push(value);
        }
    }
    Ok(samples)
}

/// Terrain from an elevation file laid out at `grid_m` spacing.
pub fn load_terrain(text: &str, grid_m: f64, max_height_m: f64) -> Result<TerrainProfile> {
    check_grid(grid_m)?;
    let values = parse_samples(text)?;
    Ok(TerrainProfile::from_values(values, grid_m, max_height_m))
}

/// Random terrain, reproducible when `seed` is given.
pub fn generate_terrain(
    length: usize,
    grid_m: f64,
    max_height_m: f64,
    seed: Option<u64>,
) -> Result<TerrainProfile> {
    check_grid(grid_m)?;
    let terrain = match seed {
        Some(seed) => {
            TerrainProfile::generate(length, grid_m, max_height_m, &mut StdRng::seed_from_u64(seed))
        }
        None => TerrainProfile::generate(length, grid_m, max_height_m, &mut rand::rng()),
    };
    Ok(terrain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_array() {
        assert_eq!(parse_samples(" [0, 12.5, 3]\n").unwrap(), vec![0.0, 12.5, 3.0]);
    }

    #[test]
    fn parses_lines_and_commas() {
        let text = "# surveyed\n0\n10, 20\n\n 30 40\n";
        assert_eq!(
            parse_samples(text).unwrap(),
            vec![0.0, 10.0, 20.0, 30.0, 40.0]
        );
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_samples("0\n1\nabc\n").unwrap_err();
        assert!(err.to_string().contains("line 3"));
        assert!(parse_samples("0\nNaN\n").is_err());
        assert!(parse_samples("[1, \"x\"]").is_err());
    }

    #[test]
    fn terrain_needs_positive_grid() {
        for grid_m in [-10.0, 0.0, f64::NAN] {
            assert!(load_terrain("0\n1\n", grid_m, 500.0).is_err());
            assert!(generate_terrain(5, grid_m, 500.0, Some(1)).is_err());
        }

        let terrain = load_terrain("[0, 10, 20]", 10.0, 500.0).unwrap();
        assert_eq!(terrain.values(), &[0.0, 10.0, 20.0]);
        assert_eq!(
            generate_terrain(20, 10.0, 500.0, Some(3)).unwrap(),
            generate_terrain(20, 10.0, 500.0, Some(3)).unwrap()
        );
    }
}
