use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser};
use tf_cli::{format_report, generate_terrain, load_terrain, ProfileReport};
use tf_core::{build_profile, check_profile, ProfileConfig, ResampleMode, VehicleEnvelope};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_resample(value: &str) -> Result<ResampleMode, String> {
    ResampleMode::parse(value).ok_or_else(|| format!("unknown resample mode '{}'", value))
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Build a terrain-following flight profile", long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["input", "generate"])))]
struct Args {
    /// Elevation file (JSON array or one number per line) at --grid-m spacing
    #[arg(long)]
    input: Option<std::path::PathBuf>,

    /// Generate random terrain with this many samples
    #[arg(long)]
    generate: Option<usize>,

    /// Seed for --generate
    #[arg(long)]
    seed: Option<u64>,

    /// Native terrain sample spacing in meters
    #[arg(long, default_value_t = 10.0)]
    grid_m: f64,

    /// Height scale of generated terrain
    #[arg(long, default_value_t = 500.0)]
    max_height_m: f64,

    /// Profile sample spacing in meters
    #[arg(long, default_value_t = 100.0)]
    step_m: f64,

    #[arg(long, default_value_t = 70.0)]
    follow_height_m: f64,

    #[arg(long, default_value_t = 5.0)]
    tolerance_m: f64,

    /// Horizontal speed in m/s
    #[arg(long, default_value_t = 26.0)]
    speed_mps: f64,

    /// Maximum climb rate in m/s
    #[arg(long, default_value_t = 2.0)]
    max_vz: f64,

    /// Minimum (descent) rate in m/s, zero or negative
    #[arg(long, default_value_t = -3.0, allow_negative_numbers = true)]
    min_vz: f64,

    /// Mandatory waypoint index in the resampled trace (repeatable)
    #[arg(long = "waypoint")]
    waypoints: Vec<usize>,

    /// How terrain is resampled to the profile step: nearest or peak
    #[arg(long, default_value = "nearest", value_parser = parse_resample)]
    resample: ResampleMode,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("tf_core=info".parse()?))
        .init();

    let args = Args::parse();

    let terrain = match (&args.input, args.generate) {
        (Some(path), _) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            load_terrain(&text, args.grid_m, args.max_height_m)?
        }
        (None, Some(length)) => {
            generate_terrain(length, args.grid_m, args.max_height_m, args.seed)?
        }
        (None, None) => bail!("either --input or --generate is required"),
    };

    let config = ProfileConfig {
        step_m: args.step_m,
        envelope: VehicleEnvelope {
            speed_mps: args.speed_mps,
            max_climb_rate_mps: args.max_vz,
            min_climb_rate_mps: args.min_vz,
            follow_height_m: args.follow_height_m,
            tolerance_m: args.tolerance_m,
        },
    };

    let samples = terrain.resample(config.step_m, args.resample)?;
    tracing::info!(
        native = terrain.len(),
        samples = samples.len(),
        mode = ?args.resample,
        "terrain ready"
    );

    let mut flags = vec![false; samples.len()];
    for index in &args.waypoints {
        match flags.get_mut(*index) {
            Some(flag) => *flag = true,
            None => bail!(
                "waypoint {} is outside the {} resampled samples",
                index,
                samples.len()
            ),
        }
    }

    let result = build_profile(&samples, &flags, &config)?;
    let check = check_profile(&result, &samples, &config);
    let report = ProfileReport::new(config, samples, result, check);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report));
    }
    Ok(())
}
