use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::error::Result;
use crate::run::{print_defaults, run_effect};

#[derive(Debug, Parser)]
#[command(
    name = "strandfx-harness",
    about = "Drive strandfx backdrops headlessly and report draw statistics",
    version
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run an effect for a number of frames.
    Run(RunArgs),

    /// Print an effect's default options as JSON.
    Defaults(DefaultsArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EffectKind {
    #[value(name = "floating-lines")]
    FloatingLines,
    Hyperspace,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    #[arg(long, value_enum, default_value = "floating-lines")]
    pub effect: EffectKind,

    /// JSON options file; missing keys take their defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = 120)]
    pub frames: u32,

    #[arg(long, default_value_t = 1280.0)]
    pub width: f64,

    #[arg(long, default_value_t = 720.0)]
    pub height: f64,

    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Milliseconds between frame timestamps.
    #[arg(long = "frame-ms", default_value_t = 16.0)]
    pub frame_ms: f64,

    /// Pointer position `x,y` delivered before the first frame.
    #[arg(long, value_parser = parse_point)]
    pub pointer: Option<(f64, f64)>,

    /// Scroll offset in pixels delivered before the first frame.
    #[arg(long)]
    pub scroll: Option<f64>,

    /// Write one JSON record per frame to this file.
    #[arg(long)]
    pub jsonl: Option<PathBuf>,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            effect: EffectKind::FloatingLines,
            config: None,
            frames: 120,
            width: 1280.0,
            height: 720.0,
            seed: 0,
            frame_ms: 16.0,
            pointer: None,
            scroll: None,
            jsonl: None,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct DefaultsArgs {
    #[arg(long, value_enum, default_value = "floating-lines")]
    pub effect: EffectKind,
}

/// Parse `x,y` into a point.
pub fn parse_point(raw: &str) -> std::result::Result<(f64, f64), String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {raw:?}"))?;
    let coord = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad coordinate {s:?}: {e}"))
    };
    Ok((coord(x)?, coord(y)?))
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    crate::logging::init(cli.log_json);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => {
            let report = run_effect(&args)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Commands::Defaults(args) => print_defaults(args.effect),
    }
}
