//! Text Element Model - Immutable Snapshots
//!
//! Elements are value snapshots extracted from the host document. The engine
//! never mutates them in place; corrections are issued back to the host as
//! discrete property writes, and the host re-reads state afterwards.

use serde::{Deserialize, Serialize};

/// Frame bounds in document points.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Light,
    #[default]
    Regular,
    Medium,
    Semibold,
    Bold,
    Black,
}

/// Snapshot of a single text run/frame as reported by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub family: String,
    /// Point size, > 0.
    pub font_size: f64,
    #[serde(default)]
    pub font_weight: FontWeight,
    /// Leading, in points or as a unitless multiple of the font size.
    pub line_height: f64,
    /// Tracking as an em-fraction.
    #[serde(default)]
    pub character_spacing: f64,
    /// RGB hex string, e.g. "#1a1a1a".
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub text: String,
    /// Estimated maximum characters per line; None when the host could not
    /// estimate it.
    #[serde(default)]
    pub line_length: Option<u32>,
    #[serde(default)]
    pub bounds: Bounds,
    #[serde(default)]
    pub overflowed: bool,
}

fn default_color() -> String {
    "#000000".to_string()
}

impl TextElement {
    /// Leading as a unitless multiple of the font size. Values above 3.0 are
    /// taken to be point leading and divided by the font size.
    pub fn leading_ratio(&self) -> f64 {
        if self.line_height > 3.0 && self.font_size > 0.0 {
            self.line_height / self.font_size
        } else {
            self.line_height
        }
    }
}

/// Parse an "#rrggbb" hex string into channel values.
pub fn parse_hex_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}
