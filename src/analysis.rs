//! Analysis System - Analyzer/Result Separation
//!
//! Analyzers produce structured results over immutable element snapshots.
//! The recommendation layer maps results to actions.

use serde::{Deserialize, Serialize};

use crate::elements::TextElement;
use crate::fonts::FontPairingAnalyzer;
use crate::profile::ReadabilityProfile;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    FontPairing,
    Readability,
    Hierarchy,
}

/// One analyzer finding for the UI collaborator.
///
/// Invariant: `suggestions` is never empty unless `kind` is Success.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(rename = "type")]
    pub kind: ResultKind,
    pub category: Category,
    pub message: String,
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_fix_available: Option<bool>,
}

/// Per-element threshold checks against a readability profile.
pub struct ReadabilityAnalyzer {
    profile: ReadabilityProfile,
}

impl ReadabilityAnalyzer {
    pub fn new() -> Self {
        Self {
            profile: ReadabilityProfile::default(),
        }
    }

    pub fn with_profile(profile: ReadabilityProfile) -> Self {
        Self { profile }
    }

    /// One warning per offending element, aggregating all of its issues.
    /// Clean elements produce nothing.
    pub fn analyze(&self, elements: &[TextElement]) -> Vec<AnalysisResult> {
        let mut results = Vec::new();

        for (i, el) in elements.iter().enumerate() {
            let mut issues: Vec<String> = Vec::new();
            let mut suggestions: Vec<String> = Vec::new();
            let p = &self.profile;

            if el.font_size < p.min_font_size {
                issues.push(format!("font size {}pt is below the comfortable minimum", el.font_size));
                suggestions.push(format!("Increase the font size to at least {}pt", p.min_font_size));
            } else if el.font_size > p.max_font_size {
                issues.push(format!("font size {}pt exceeds the usable maximum", el.font_size));
                suggestions.push(format!("Reduce the font size to {}pt or below", p.max_font_size));
            }

            let leading = el.leading_ratio();
            if leading < p.min_line_height {
                issues.push(format!("line height {leading} is too tight"));
                suggestions.push(format!("Open the leading up to around {}", p.optimal_line_height));
            } else if leading > p.max_line_height {
                issues.push(format!("line height {leading} is too loose"));
                suggestions.push(format!("Tighten the leading to around {}", p.optimal_line_height));
            }

            if el.character_spacing.abs() > p.max_tracking {
                issues.push(format!("tracking {} is extreme", el.character_spacing));
                suggestions.push("Bring tracking back toward 0 to restore word shapes".to_string());
            }

            // Skipped when the host could not estimate a line length.
            if let Some(len) = el.line_length {
                if len < p.min_line_length || len > p.max_line_length {
                    issues.push(format!("line length of {len} characters is outside the readable range"));
                    suggestions.push(format!(
                        "Aim for about {} characters per line",
                        p.optimal_line_length
                    ));
                }
            }

            if !issues.is_empty() {
                results.push(AnalysisResult {
                    kind: ResultKind::Warning,
                    category: Category::Readability,
                    message: format!("Element {}: {}", i + 1, issues.join("; ")),
                    suggestions,
                    severity: None,
                    auto_fix_available: Some(true),
                });
            }
        }

        results
    }
}

impl Default for ReadabilityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// A step ratio below this reads as no visual separation.
pub const MIN_SCALE_STEP: f64 = 1.15;
/// A step ratio above this reads as a visual gap.
pub const MAX_SCALE_STEP: f64 = 3.0;

/// Checks scale-ratio consistency across the selection's size sequence.
pub struct HierarchyAnalyzer;

impl HierarchyAnalyzer {
    /// None when the selection has fewer than two elements.
    pub fn analyze(elements: &[TextElement]) -> Option<AnalysisResult> {
        if elements.len() < 2 {
            return None;
        }

        let mut sizes: Vec<f64> = elements.iter().map(|e| e.font_size).collect();
        sizes.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        let poor = sizes.windows(2).any(|w| {
            let ratio = if w[1] > 0.0 { w[0] / w[1] } else { 1.0 };
            ratio < MIN_SCALE_STEP || ratio > MAX_SCALE_STEP
        });

        if poor {
            Some(AnalysisResult {
                kind: ResultKind::Info,
                category: Category::Hierarchy,
                message: "Font size hierarchy could be improved".to_string(),
                suggestions: vec![
                    "Use consistent scale ratios (1.25x, 1.5x, 2x) between hierarchy levels"
                        .to_string(),
                    "Keep at least a 1.2x step between adjacent levels".to_string(),
                ],
                severity: None,
                auto_fix_available: Some(false),
            })
        } else {
            Some(AnalysisResult {
                kind: ResultKind::Success,
                category: Category::Hierarchy,
                message: "Font size hierarchy is well-established".to_string(),
                suggestions: vec![],
                severity: None,
                auto_fix_available: None,
            })
        }
    }
}

/// Runs every analyzer over a selection in a fixed order:
/// font pairing, then per-element readability, then hierarchy.
pub struct AnalysisEngine {
    readability: ReadabilityAnalyzer,
}

impl AnalysisEngine {
    pub fn new() -> Self {
        Self {
            readability: ReadabilityAnalyzer::new(),
        }
    }

    pub fn with_profile(profile: ReadabilityProfile) -> Self {
        Self {
            readability: ReadabilityAnalyzer::with_profile(profile),
        }
    }

    pub fn analyze(&self, elements: &[TextElement]) -> Vec<AnalysisResult> {
        let mut results = Vec::new();
        if let Some(pairing) = FontPairingAnalyzer::analyze(elements) {
            results.push(pairing);
        }
        results.extend(self.readability.analyze(elements));
        if let Some(hierarchy) = HierarchyAnalyzer::analyze(elements) {
            results.push(hierarchy);
        }
        results
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}
