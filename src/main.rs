use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

mod color;
mod config;
mod display;
mod geometry;
mod mapper;
mod renderer;
mod surface;

use color::RgbColor;
use config::Config;
use display::DisplayMode;

#[derive(Parser, Debug)]
#[command(name = "concentric")]
#[command(author, version, about = "Concentric rotating squares in the terminal")]
pub struct Args {
    /// Display mode: terminal or print
    #[arg(short, long)]
    mode: Option<DisplayMode>,

    /// Config file path
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Write a commented default config to the XDG config path and exit
    #[arg(long)]
    init_config: bool,

    /// Surface width in braille dots (print mode)
    #[arg(long)]
    width: Option<u32>,

    /// Surface height in braille dots (print mode)
    #[arg(long)]
    height: Option<u32>,

    /// Number of squares to draw
    #[arg(short, long)]
    generations: Option<usize>,

    /// Fraction each corner moves toward the next per square (0.0-1.0)
    #[arg(short = 'q', long)]
    contraction: Option<f64>,

    /// Side of the first square relative to the smaller surface dimension
    #[arg(long)]
    side_fraction: Option<f64>,

    /// Initial stroke color as hex, e.g. "#2196F3"
    #[arg(long)]
    stroke_color: Option<RgbColor>,
}

/// Default filter directive for a display mode.
/// The interactive view owns the screen, so it stays quiet unless RUST_LOG says otherwise.
fn default_log_directive(mode: DisplayMode) -> &'static str {
    match mode {
        DisplayMode::Print => "concentric=info",
        DisplayMode::Terminal => "concentric=warn",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.init_config {
        let path = Config::init_default_config()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let mut default_path_error = None;
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => match Config::read_default_path() {
            Some((_, Ok(config))) => config,
            Some((path, Err(e))) => {
                default_path_error = Some((path, e));
                Config::default()
            }
            None => Config::default(),
        },
    };
    config.merge_args(&args);

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_log_directive(config.display.mode).parse()?),
        )
        .init();

    if let Some((path, e)) = default_path_error {
        warn!("Failed to parse config at {}: {}. Using defaults.", path.display(), e);
    }

    config.squares.validate()?;

    info!("Starting concentric in {:?} mode", config.display.mode);

    match config.display.mode {
        DisplayMode::Terminal => display::terminal::run(config).await?,
        DisplayMode::Print => display::print::run(&config)?,
    }

    Ok(())
}
