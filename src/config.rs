use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::color::{HueCycle, RgbColor};
use crate::display::DisplayMode;
use crate::geometry::Contraction;
use crate::renderer::RenderPolicy;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("contraction must be strictly between 0 and 1, got {0}")]
    Contraction(f64),
    #[error("side_fraction must be in (0, 1], got {0}")]
    SideFraction(f64),
    #[error("generations must be at least 1")]
    NoGenerations,
    #[error("{name} must be in [0, 1], got {value}")]
    Unit { name: &'static str, value: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub surface: SurfaceConfig,
    pub squares: SquaresConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
    /// How long the terminal size must stay unchanged before a resize redraws.
    pub resize_settle_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Terminal,
            resize_settle_ms: 100,
        }
    }
}

/// Surface size in braille dots, used by print mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 160,
            height: 96,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SquaresConfig {
    pub generations: usize,
    pub side_fraction: f64,
    pub contraction: f64,
    pub hue_step: u32,
    pub saturation: f32,
    pub lightness: f32,
    pub stroke_color: RgbColor,
}

impl Default for SquaresConfig {
    fn default() -> Self {
        let policy = RenderPolicy::default();
        Self {
            generations: policy.generations,
            side_fraction: policy.side_fraction,
            contraction: policy.contraction.q(),
            hue_step: policy.hues.hue_step,
            saturation: policy.hues.saturation,
            lightness: policy.hues.lightness,
            stroke_color: policy.base_stroke,
        }
    }
}

impl SquaresConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.contraction > 0.0 && self.contraction < 1.0) {
            return Err(ConfigError::Contraction(self.contraction));
        }
        if !(self.side_fraction > 0.0 && self.side_fraction <= 1.0) {
            return Err(ConfigError::SideFraction(self.side_fraction));
        }
        if self.generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        for (name, value) in [("saturation", self.saturation), ("lightness", self.lightness)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Unit { name, value });
            }
        }
        Ok(())
    }

    pub fn policy(&self) -> RenderPolicy {
        RenderPolicy {
            generations: self.generations,
            side_fraction: self.side_fraction,
            contraction: Contraction::new(self.contraction),
            hues: HueCycle {
                hue_step: self.hue_step,
                saturation: self.saturation,
                lightness: self.lightness,
            },
            base_stroke: self.stroke_color,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the default XDG config path (~/.config/concentric/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("concentric").join("config.toml"))
    }

    /// Read the config at the default XDG path, if a file exists there.
    /// Parse failures are returned with the path so the caller can report them
    /// once logging is up.
    pub fn read_default_path() -> Option<(PathBuf, Result<Self>)> {
        let path = Self::default_path()?;
        if !path.exists() {
            return None;
        }
        let loaded = Self::load(&path);
        Some((path, loaded))
    }

    /// Initialize default config file at XDG path, returns the path
    pub fn init_default_config() -> Result<PathBuf> {
        let path = Self::default_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, Self::generate_config_template())?;

        Ok(path)
    }

    /// Generate a commented TOML config template
    pub fn generate_config_template() -> String {
        r#"# Concentric Configuration
# This file is auto-generated. Edit as needed.

[display]
# Display mode: "terminal" (interactive) or "print" (render once to stdout)
mode = "terminal"
# Milliseconds the terminal size must stay unchanged before redrawing
resize_settle_ms = 100

[surface]
# Surface size in braille dots for print mode (2 dots per column, 4 per row)
width = 160
height = 96

[squares]
# Number of squares to draw
generations = 50
# Side of the first square as a fraction of the smaller surface dimension (0.0-1.0]
side_fraction = 0.95
# Fraction of the way each corner moves toward the next one per square (0.0-1.0)
contraction = 0.05
# Hue advance per square, in degrees
hue_step = 7
# HSL saturation and lightness (0.0-1.0)
saturation = 0.7
lightness = 0.5
# Stroke set before the first square is drawn
stroke_color = { r = 33, g = 150, b = 243 }
"#
        .to_string()
    }

    /// Merge CLI arguments into config (CLI takes priority)
    pub fn merge_args(&mut self, args: &crate::Args) {
        if let Some(mode) = args.mode {
            self.display.mode = mode;
        }
        if let Some(width) = args.width {
            self.surface.width = width;
        }
        if let Some(height) = args.height {
            self.surface.height = height;
        }
        if let Some(generations) = args.generations {
            self.squares.generations = generations;
        }
        if let Some(side_fraction) = args.side_fraction {
            self.squares.side_fraction = side_fraction;
        }
        if let Some(contraction) = args.contraction {
            self.squares.contraction = contraction;
        }
        if let Some(color) = args.stroke_color {
            self.squares.stroke_color = color;
        }
    }
}
