//! Format Rule System - Declarative Batch Formatting
//!
//! Rules are declarative contracts: a selector predicate plus the property
//! writes to perform when it holds. Rules apply in order; later rules
//! overwrite earlier writes to the same property. Rule sets are loaded from
//! JSON documents and version-gated against the engine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::elements::TextElement;
use crate::host::{HostDocument, PropertyWrite};
use crate::profile::ReadabilityProfile;

pub const DEFAULT_HEADING_THRESHOLD: f64 = 18.0;

fn default_heading_threshold() -> f64 {
    DEFAULT_HEADING_THRESHOLD
}

/// Selector predicate, a closed discriminated union. Each rule carries its
/// own threshold, so `heading` and `body` rules with differing thresholds
/// need not partition the selection. That asymmetry is inherited behavior
/// and is exercised in tests rather than normalized away.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "selector", rename_all = "lowercase")]
pub enum Selector {
    All,
    Heading {
        #[serde(
            default = "default_heading_threshold",
            rename = "headingThreshold"
        )]
        heading_threshold: f64,
    },
    Body {
        #[serde(
            default = "default_heading_threshold",
            rename = "headingThreshold"
        )]
        heading_threshold: f64,
    },
    Contains { text: String },
}

impl Selector {
    pub fn matches(&self, element: &TextElement) -> bool {
        match self {
            Selector::All => true,
            Selector::Heading { heading_threshold } => element.font_size > *heading_threshold,
            Selector::Body { heading_threshold } => element.font_size <= *heading_threshold,
            Selector::Contains { text } => element.text.contains(text.as_str()),
        }
    }
}

/// One declarative formatting rule. Undefined properties are left untouched
/// on matching elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatRule {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub selector: Selector,
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_size: Option<f64>,
    /// Unitless multiple of the rule's own `font_size`; converted to point
    /// leading on application (falling back to the element's current size
    /// when the rule sets no size).
    #[serde(default)]
    pub line_height: Option<f64>,
    #[serde(default)]
    pub character_spacing: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
}

impl FormatRule {
    /// Identifier reported back per element: the rule name, or a positional
    /// fallback.
    fn identifier(&self, position: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("rule-{position}"))
    }

    /// Resolved property writes for one element.
    fn writes_for(&self, element: &TextElement) -> Vec<PropertyWrite> {
        let mut writes = Vec::new();
        if let Some(family) = &self.font_family {
            writes.push(PropertyWrite::FontFamily(family.clone()));
        }
        if let Some(size) = self.font_size {
            writes.push(PropertyWrite::FontSize(size));
        }
        if let Some(ratio) = self.line_height {
            let base = self.font_size.unwrap_or(element.font_size);
            writes.push(PropertyWrite::LineHeight(ratio * base));
        }
        if let Some(tracking) = self.character_spacing {
            writes.push(PropertyWrite::CharacterSpacing(tracking));
        }
        if let Some(color) = &self.color {
            writes.push(PropertyWrite::Color(color.clone()));
        }
        writes
    }
}

/// Per-element outcome of a rule pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleApplication {
    pub index: usize,
    pub applied_rules: Vec<String>,
    /// Property writes in application order; later writes to the same
    /// property take precedence.
    pub writes: Vec<PropertyWrite>,
}

/// Matches selectors against elements and issues property writes.
pub struct FormatRuleEngine;

impl FormatRuleEngine {
    /// Pure planning pass: no host interaction, no element mutation.
    pub fn plan(elements: &[TextElement], rules: &[FormatRule]) -> Vec<RuleApplication> {
        elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                let mut applied_rules = Vec::new();
                let mut writes = Vec::new();
                for (position, rule) in rules.iter().enumerate() {
                    if rule.selector.matches(element) {
                        writes.extend(rule.writes_for(element));
                        applied_rules.push(rule.identifier(position));
                    }
                }
                RuleApplication {
                    index,
                    applied_rules,
                    writes,
                }
            })
            .collect()
    }

    /// Plan and push the writes through the host. A failed write (for
    /// instance an unresolvable font) is logged and skipped; the remaining
    /// writes for that element and all other elements still go through.
    pub fn apply<H: HostDocument>(
        host: &mut H,
        elements: &[TextElement],
        rules: &[FormatRule],
    ) -> Vec<RuleApplication> {
        let applications = Self::plan(elements, rules);
        for application in &applications {
            for write in &application.writes {
                if let Err(e) = host.apply(application.index, write) {
                    warn!(
                        index = application.index,
                        property = write.property_name(),
                        "skipping property write: {e}"
                    );
                }
            }
        }
        applications
    }
}

/// A named, versioned collection of format rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub ruleset_version: String,
    pub engine_min_version: String,
    /// Readability threshold overrides carried by this rule set, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readability: Option<ReadabilityBounds>,
    pub rules: Vec<FormatRule>,
}

/// Font size bounds a rule set may carry to tighten readability analysis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadabilityBounds {
    pub min_font_size: f64,
    pub max_font_size: f64,
}

impl RuleSet {
    /// Profile under rule-set authority when bounds are present.
    pub fn readability_profile(&self) -> Option<ReadabilityProfile> {
        self.readability
            .map(|b| ReadabilityProfile::from_rule_set(b.min_font_size, b.max_font_size))
    }
}

/// Rule set registry - loads and caches rule sets.
pub struct RuleSetRegistry {
    rule_sets: HashMap<String, RuleSet>,
}

impl RuleSetRegistry {
    pub fn new() -> Self {
        Self {
            rule_sets: HashMap::new(),
        }
    }

    pub fn load_from_dir(dir: &Path) -> Result<Self, std::io::Error> {
        let mut registry = Self::new();
        if dir.exists() {
            for entry in fs::read_dir(dir)? {
                let entry = entry?;
                let path = entry.path();
                if path.extension().map_or(false, |e| e == "json") {
                    if let Ok(content) = fs::read_to_string(&path) {
                        match serde_json::from_str::<RuleSet>(&content) {
                            Ok(rule_set) => {
                                registry.rule_sets.insert(rule_set.id.clone(), rule_set);
                            }
                            Err(e) => {
                                warn!("ignoring malformed rule set {}: {e}", path.display());
                            }
                        }
                    }
                }
            }
        }
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&RuleSet> {
        self.rule_sets.get(id)
    }

    pub fn list(&self) -> Vec<&RuleSet> {
        self.rule_sets.values().collect()
    }

    pub fn register(&mut self, rule_set: RuleSet) {
        self.rule_sets.insert(rule_set.id.clone(), rule_set);
    }
}

impl Default for RuleSetRegistry {
    fn default() -> Self {
        Self::new()
    }
}
