#![deny(unsafe_code)]
//! Headless renderer for the trailfield particle trail system.
//!
//! Subcommands:
//! - `render`: run the simulation on a virtual clock and write a PNG
//! - `params`: print the parameter schema

mod error;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use error::CliError;
use glam::Vec2;
use serde_json::Value;
use trailfield_core::{Config, ParamStore, RunSpec, Xorshift64};
use trailfield_raster::snapshot::write_png;
use trailfield_raster::SoftwareTrail;
use trailfield_sim::{AttractorOpts, ModifierMarker, RotatorOpts, Session};

#[derive(Parser)]
#[command(name = "trailfield", about = "Particle trail renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the simulation for N frames and write a PNG snapshot.
    Render(RenderArgs),
    /// Print every parameter with its type, default and range.
    Params,
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Canvas width in pixels.
    #[arg(short = 'W', long, default_value_t = 800)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(short = 'H', long, default_value_t = 600)]
    height: u32,

    /// Number of frames to simulate.
    #[arg(short, long, default_value_t = 600)]
    frames: usize,

    /// PRNG seed; omitted means seeded from the clock.
    #[arg(long)]
    seed: Option<u64>,

    /// Virtual frame rate of the clock driving the simulation.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Parameters as a JSON object.
    #[arg(long, default_value = "{}")]
    params: String,

    /// Single parameter override, `name=value`. Repeatable.
    #[arg(long = "set", value_name = "NAME=VALUE")]
    sets: Vec<String>,

    /// Attractor position `x,y`. Repeatable.
    #[arg(long = "attractor", value_name = "X,Y", value_parser = parse_point)]
    attractors: Vec<Vec2>,

    /// Rotator position `x,y`. Repeatable.
    #[arg(long = "rotator", value_name = "X,Y", value_parser = parse_point)]
    rotators: Vec<Vec2>,

    /// Output file path.
    #[arg(short, long, default_value = "trail.png")]
    output: PathBuf,
}

/// What a finished render reports.
struct RenderReport {
    spec: RunSpec,
    markers: Vec<ModifierMarker>,
    segments: usize,
}

fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("invalid coordinate '{v}'"))
    };
    Ok(Vec2::new(parse(x)?, parse(y)?))
}

/// Splits `name=value`; the value is read as JSON, falling back to a bare
/// string so `--set jitter_mode=nudge` works unquoted.
fn parse_set(s: &str) -> Result<(String, Value), CliError> {
    let (name, raw) = s
        .split_once('=')
        .ok_or_else(|| CliError::Input(format!("expected NAME=VALUE, got '{s}'")))?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
    Ok((name.trim().to_owned(), value))
}

fn resolve_config(params: &str, sets: &[String]) -> Result<Config, CliError> {
    let params: Value = serde_json::from_str(params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    if !params.is_object() {
        return Err(CliError::Input("--params must be a JSON object".into()));
    }
    let mut store = ParamStore::new(Config::from_json(&params));
    for entry in sets {
        let (name, value) = parse_set(entry)?;
        store.set_param(&name, value)?;
    }
    Ok(store.snapshot())
}

fn render(args: &RenderArgs) -> Result<RenderReport, CliError> {
    let config = resolve_config(&args.params, &args.sets)?;
    let seed = args
        .seed
        .unwrap_or_else(|| Xorshift64::from_time().next_u64());

    let mut spec = RunSpec::new(args.width, args.height, seed);
    spec.params = config.to_json();
    spec.frames = args.frames;
    spec.fps = args.fps;
    spec.validate()?;

    let sink = SoftwareTrail::new(spec.width, spec.height)?;
    let mut session = Session::new(sink, config.clone(), Xorshift64::new(seed), 0.0);
    for &pos in &args.attractors {
        session.add_attractor(
            pos,
            AttractorOpts {
                radius: Some(config.mod_radius as f32),
                strength: Some(config.mod_strength as f32),
            },
        );
    }
    for &pos in &args.rotators {
        session.add_rotator(
            pos,
            RotatorOpts {
                radius: Some(config.mod_radius as f32),
                rotation: Some(config.mod_rotation as f32),
            },
        );
    }

    let interval = spec.frame_interval();
    let mut segments = 0;
    for frame in 1..=spec.frames {
        segments += session.frame(frame as f64 * interval, &config);
    }
    tracing::info!(frames = spec.frames, segments, seed, "simulation finished");

    write_png(session.sink().front(), session.background(), &args.output)?;

    Ok(RenderReport {
        markers: session.modifier_markers().collect(),
        spec,
        segments,
    })
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Params => {
            let schema = Config::param_schema();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&schema)?);
            } else if let Value::Object(entries) = schema {
                for (name, entry) in entries {
                    println!(
                        "{name:<18} {:<8} default {:<10} {}",
                        entry["type"].as_str().unwrap_or("?"),
                        entry["default"].to_string(),
                        entry["description"].as_str().unwrap_or(""),
                    );
                }
            }
        }
        Command::Render(args) => {
            let report = render(&args)?;
            if cli.json {
                let info = serde_json::json!({
                    "run": report.spec,
                    "modifiers": report.markers,
                    "segments": report.segments,
                    "output": args.output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                let s = &report.spec;
                eprintln!(
                    "rendered {}x{} ({} frames at {} fps, seed {}, {} segments) -> {}",
                    s.width,
                    s.height,
                    s.frames,
                    s.fps,
                    s.seed,
                    report.segments,
                    args.output.display()
                );
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
