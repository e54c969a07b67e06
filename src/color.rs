use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RGB color for strokes and configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse from hex string like "#FF0000" or "FF0000"
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }
}

impl FromStr for RgbColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| format!("Invalid hex color: {}", s))
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Convert HSL (hue in degrees, saturation/lightness in 0.0..=1.0) to 8-bit RGB.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> RgbColor {
    let hsl = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb = hsl.into_color();
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;

    RgbColor::new(channel(rgb.red), channel(rgb.green), channel(rgb.blue))
}

/// Cosmetic per-generation hue cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueCycle {
    pub hue_step: u32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Default for HueCycle {
    fn default() -> Self {
        Self {
            hue_step: 7,
            saturation: 0.7,
            lightness: 0.5,
        }
    }
}

impl HueCycle {
    pub fn hue(&self, generation: usize) -> u32 {
        ((generation as u64 * u64::from(self.hue_step)) % 360) as u32
    }

    pub fn color(&self, generation: usize) -> RgbColor {
        hsl_to_rgb(self.hue(generation) as f32, self.saturation, self.lightness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(RgbColor::from_hex("#2196F3"), Some(RgbColor::new(0x21, 0x96, 0xF3)));
        assert_eq!(RgbColor::from_hex("ff0000"), Some(RgbColor::new(255, 0, 0)));
        assert_eq!(RgbColor::from_hex("#12345"), None);
        assert_eq!(RgbColor::from_hex("#GG0000"), None);
        assert_eq!("#00ff00".parse::<RgbColor>(), Ok(RgbColor::new(0, 255, 0)));
        assert_eq!(RgbColor::new(33, 150, 243).to_string(), "#2196F3");
    }

    #[test]
    fn primary_hues_convert() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), RgbColor::new(255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), RgbColor::new(0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), RgbColor::new(0, 0, 255));
        assert_eq!(hsl_to_rgb(0.0, 0.0, 1.0), RgbColor::new(255, 255, 255));
    }

    #[test]
    fn default_cycle_matches_css_hsl() {
        // hsl(0, 70%, 50%)
        assert_eq!(HueCycle::default().color(0), RgbColor::new(217, 38, 38));
    }

    #[test]
    fn hue_wraps_at_360() {
        let cycle = HueCycle::default();
        assert_eq!(cycle.hue(0), 0);
        assert_eq!(cycle.hue(49), 343);
        assert_eq!(cycle.hue(52), 4);
        assert_eq!(cycle.color(52), hsl_to_rgb(4.0, 0.7, 0.5));
    }
}
