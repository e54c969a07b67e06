pub mod braille;
pub mod print;
pub mod terminal;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Interactive full-screen view
    #[default]
    Terminal,
    /// Render once and write the braille rows to stdout
    Print,
}
