//! Typography Pipeline - Single Entry Point
//!
//! CRITICAL: build_report MUST run the analysis internally. No bypass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::analysis::{AnalysisEngine, AnalysisResult};
use crate::autofit::{AdjustmentParams, AutoFitError, AutoFitSolver, FitResult, TextFrame};
use crate::elements::TextElement;
use crate::hashing::{compute_job_hash, compute_report_hash};
use crate::host::HostDocument;
use crate::kerning::{AutoKernMode, KerningPair};
use crate::profile::ReadabilityProfile;
use crate::recommend::{aggregate, Recommendation};
use crate::rules::{
    FormatRule, FormatRuleEngine, RuleApplication, RuleSet, RuleSetRegistry, Selector,
};
use crate::scale::{HierarchyScaler, SizeChange, DEFAULT_SCALE_RATIO};
use crate::ENGINE_VERSION;

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static ANALYSIS_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_analysis_call_count() -> u32 {
    ANALYSIS_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_analysis_call_count() {
    ANALYSIS_CALL_COUNT.store(0, Ordering::SeqCst);
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Rule set not found: {0}")]
    RuleSetNotFound(String),

    #[error("Unknown fix type: {0}")]
    UnknownFixType(String),

    #[error("Rule set version {0} requires engine >= {1}, current is {2}")]
    EngineVersionMismatch(String, String, String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Auto-fit error: {0}")]
    AutoFit(#[from] AutoFitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Manifest for one full analysis run over a selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    pub engine_version: String,
    pub element_count: usize,
    pub results: Vec<AnalysisResult>,
    pub recommendations: Vec<Recommendation>,
    pub report_hash: String,
}

/// Receipt for one rule-set application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatJob {
    pub ruleset_id: String,
    pub ruleset_version: String,
    pub engine_version: String,
    pub job_hash: String,
    pub applications: Vec<RuleApplication>,
}

/// Corrective task categories the host can request by name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FixKind {
    Kerning,
    Alignment,
    Hierarchy,
    Consistency,
    Readability,
}

impl std::str::FromStr for FixKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kerning" => Ok(FixKind::Kerning),
            "alignment" => Ok(FixKind::Alignment),
            "hierarchy" => Ok(FixKind::Hierarchy),
            "consistency" => Ok(FixKind::Consistency),
            "readability" => Ok(FixKind::Readability),
            other => Err(EngineError::UnknownFixType(other.to_string())),
        }
    }
}

/// Default corrective plan for a fix kind; executed by the caller through
/// the regular pipeline operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "plan", rename_all = "camelCase")]
pub enum FixPlan {
    #[serde(rename_all = "camelCase")]
    Kerning {
        mode: AutoKernMode,
        pairs: Vec<KerningPair>,
    },
    #[serde(rename_all = "camelCase")]
    OpticalMargins { margin_adjustment: f64 },
    #[serde(rename_all = "camelCase")]
    Rescale {
        base_size: Option<f64>,
        scale_ratio: f64,
    },
    #[serde(rename_all = "camelCase")]
    Reformat { rules: Vec<FormatRule> },
}

/// The typography pipeline - single entry point for analysis and correction.
pub struct TypographyPipeline {
    registry: RuleSetRegistry,
    engine: AnalysisEngine,
}

impl TypographyPipeline {
    pub fn new(registry: RuleSetRegistry) -> Self {
        Self {
            registry,
            engine: AnalysisEngine::new(),
        }
    }

    pub fn with_profile(registry: RuleSetRegistry, profile: ReadabilityProfile) -> Self {
        Self {
            registry,
            engine: AnalysisEngine::with_profile(profile),
        }
    }

    /// List all available rule sets.
    pub fn list_rule_sets(&self) -> Vec<&RuleSet> {
        self.registry.list()
    }

    /// Get a specific rule set.
    pub fn get_rule_set(&self, id: &str) -> Option<&RuleSet> {
        self.registry.get(id)
    }

    /// Run every analyzer over the selection in the fixed order
    /// (font pairing, per-element readability, hierarchy).
    ///
    /// Every analysis run flows through here or through
    /// `analyze_with_rule_set`; both are counted under `test-hooks`.
    pub fn analyze(&self, elements: &[TextElement]) -> Vec<AnalysisResult> {
        #[cfg(feature = "test-hooks")]
        ANALYSIS_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        self.engine.analyze(elements)
    }

    /// Run the analyzers under a rule set's threshold authority. Falls back
    /// to the engine profile when the rule set carries no bounds.
    pub fn analyze_with_rule_set(
        &self,
        elements: &[TextElement],
        ruleset_id: &str,
    ) -> Result<Vec<AnalysisResult>, EngineError> {
        let rule_set = self
            .registry
            .get(ruleset_id)
            .ok_or_else(|| EngineError::RuleSetNotFound(ruleset_id.to_string()))?;

        match rule_set.readability_profile() {
            Some(profile) => {
                #[cfg(feature = "test-hooks")]
                ANALYSIS_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

                Ok(AnalysisEngine::with_profile(profile).analyze(elements))
            }
            None => Ok(self.analyze(elements)),
        }
    }

    /// Merge analyzer results into the prioritized action list.
    pub fn recommend(&self, results: &[AnalysisResult]) -> Vec<Recommendation> {
        aggregate(results)
    }

    /// Full analysis run wrapped in a deterministic-hashed manifest.
    ///
    /// CRITICAL: This ALWAYS calls analyze internally. No bypass possible.
    pub fn build_report(&self, elements: &[TextElement]) -> Result<AnalysisReport, EngineError> {
        let results = self.analyze(elements);
        let recommendations = self.recommend(&results);

        let mut report = AnalysisReport {
            id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            element_count: elements.len(),
            results,
            recommendations,
            report_hash: String::new(), // Computed after
        };
        report.report_hash = compute_report_hash(&report)?;

        Ok(report)
    }

    /// Apply a registered rule set through the host. The rule set's engine
    /// version floor is checked first; a failure here aborts only this
    /// operation, never a wider batch.
    pub fn apply_rule_set<H: HostDocument>(
        &self,
        host: &mut H,
        elements: &[TextElement],
        ruleset_id: &str,
    ) -> Result<FormatJob, EngineError> {
        let rule_set = self
            .registry
            .get(ruleset_id)
            .ok_or_else(|| EngineError::RuleSetNotFound(ruleset_id.to_string()))?;

        self.check_engine_version(rule_set)?;

        let applications = FormatRuleEngine::apply(host, elements, &rule_set.rules);
        let job_hash = compute_job_hash(
            &rule_set.id,
            &rule_set.ruleset_version,
            &elements,
            ENGINE_VERSION,
        )?;

        Ok(FormatJob {
            ruleset_id: rule_set.id.clone(),
            ruleset_version: rule_set.ruleset_version.clone(),
            engine_version: ENGINE_VERSION.to_string(),
            job_hash,
            applications,
        })
    }

    /// Apply ad-hoc rules supplied by the caller (no registry lookup).
    pub fn apply_rules<H: HostDocument>(
        &self,
        host: &mut H,
        elements: &[TextElement],
        rules: &[FormatRule],
    ) -> Vec<RuleApplication> {
        FormatRuleEngine::apply(host, elements, rules)
    }

    /// Rescale the selection onto a geometric type scale.
    pub fn rescale_hierarchy<H: HostDocument>(
        &self,
        host: &mut H,
        elements: &[TextElement],
        base_size: Option<f64>,
        scale_ratio: f64,
    ) -> Vec<SizeChange> {
        HierarchyScaler::apply(host, elements, base_size, scale_ratio)
    }

    /// Fit one frame's type size to its bounds.
    pub fn auto_fit<F: TextFrame>(
        &self,
        frame: &mut F,
        index: usize,
        params: &AdjustmentParams,
    ) -> Result<FitResult, EngineError> {
        Ok(AutoFitSolver::fit_frame(frame, index, params)?)
    }

    /// Resolve a host-requested fix type into its default corrective plan.
    /// Unknown fix types are a named failure for that operation only.
    pub fn fix_plan(&self, task_type: &str) -> Result<FixPlan, EngineError> {
        let kind: FixKind = task_type.parse()?;
        Ok(match kind {
            FixKind::Kerning => FixPlan::Kerning {
                mode: AutoKernMode::Optical,
                pairs: vec![KerningPair {
                    characters: "AV".to_string(),
                    adjustment: -50.0,
                }],
            },
            FixKind::Alignment => FixPlan::OpticalMargins {
                margin_adjustment: 0.05,
            },
            FixKind::Hierarchy => FixPlan::Rescale {
                base_size: None,
                scale_ratio: DEFAULT_SCALE_RATIO,
            },
            FixKind::Consistency | FixKind::Readability => FixPlan::Reformat {
                rules: vec![FormatRule {
                    name: Some("auto-fix".to_string()),
                    selector: Selector::All,
                    font_family: None,
                    font_size: None,
                    line_height: None,
                    character_spacing: None,
                    color: None,
                }],
            },
        })
    }

    fn check_engine_version(&self, rule_set: &RuleSet) -> Result<(), EngineError> {
        let engine_ver = semver::Version::parse(ENGINE_VERSION)
            .map_err(|_| EngineError::InvalidParams("Invalid engine version".into()))?;
        let min_ver = semver::Version::parse(&rule_set.engine_min_version)
            .map_err(|_| EngineError::InvalidParams("Invalid rule set engine floor".into()))?;

        if engine_ver < min_ver {
            return Err(EngineError::EngineVersionMismatch(
                rule_set.ruleset_version.clone(),
                rule_set.engine_min_version.clone(),
                ENGINE_VERSION.to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for TypographyPipeline {
    fn default() -> Self {
        Self::new(RuleSetRegistry::default())
    }
}
