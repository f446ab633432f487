//! Readability Threshold Profiles
//!
//! Defines the source of readability thresholds to prevent conditional sprawl.

use serde::{Deserialize, Serialize};

/// ThresholdAuthority determines where readability thresholds come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdAuthority {
    /// Engine defaults (fallback)
    System,
    /// Rule-set defined thresholds
    RuleSet,
    /// User-provided overrides (with validation)
    User,
}

impl Default for ThresholdAuthority {
    fn default() -> Self {
        Self::System
    }
}

/// Threshold set driving the readability checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadabilityProfile {
    pub authority: ThresholdAuthority,
    pub min_font_size: f64,
    pub max_font_size: f64,
    pub min_line_height: f64,
    pub max_line_height: f64,
    pub optimal_line_height: f64,
    pub min_line_length: u32,
    pub max_line_length: u32,
    pub optimal_line_length: u32,
    /// Tracking magnitude beyond this is flagged as extreme.
    pub max_tracking: f64,
}

impl Default for ReadabilityProfile {
    fn default() -> Self {
        Self {
            authority: ThresholdAuthority::System,
            min_font_size: 9.0,
            max_font_size: 72.0,
            min_line_height: 1.2,
            max_line_height: 1.8,
            optimal_line_height: 1.4,
            min_line_length: 45,
            max_line_length: 75,
            optimal_line_length: 60,
            max_tracking: 0.1,
        }
    }
}

impl ReadabilityProfile {
    /// Create from rule-set authority.
    pub fn from_rule_set(min_font_size: f64, max_font_size: f64) -> Self {
        Self {
            authority: ThresholdAuthority::RuleSet,
            min_font_size,
            max_font_size,
            ..Self::default()
        }
    }

    /// Create from user overrides with validation.
    pub fn from_user(
        min_font_size: f64,
        max_font_size: f64,
        min_line_height: f64,
        max_line_height: f64,
    ) -> Result<Self, &'static str> {
        if min_font_size <= 0.0 || min_font_size >= max_font_size {
            return Err("Font size bounds must satisfy 0 < min < max");
        }
        if min_line_height <= 0.0 || min_line_height >= max_line_height {
            return Err("Line height bounds must satisfy 0 < min < max");
        }
        Ok(Self {
            authority: ThresholdAuthority::User,
            min_font_size,
            max_font_size,
            min_line_height,
            max_line_height,
            ..Self::default()
        })
    }
}
