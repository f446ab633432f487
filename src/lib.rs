//! TypeCraft Core - Typography Correction Engine
//!
//! # The Five Laws (Non-Negotiable)
//! 1. Snapshots Are Truth
//! 2. Rules Are Declarative Contracts
//! 3. Analysis Is Protective
//! 4. Corrections Are Discrete Property Writes
//! 5. Iteration Is Bounded

pub mod analysis;
pub mod autofit;
pub mod elements;
pub mod fonts;
pub mod hashing;
pub mod host;
pub mod kerning;
pub mod pipeline;
pub mod profile;
pub mod recommend;
pub mod rules;
pub mod scale;

pub use analysis::{AnalysisEngine, AnalysisResult, Category, ResultKind};
pub use autofit::{AdjustmentParams, AutoFitSolver, FitResult, TextFrame, MAX_ITERATIONS};
pub use elements::{Bounds, FontWeight, TextElement};
pub use fonts::{categorize_family, FontCategory, FontPairingAnalyzer};
pub use hashing::{canonical_json, compute_job_hash, compute_report_hash};
pub use host::{HostDocument, PropertyWrite, SnapshotHost};
pub use pipeline::{AnalysisReport, EngineError, FormatJob, TypographyPipeline};
pub use recommend::{Priority, Recommendation};
pub use rules::{FormatRule, FormatRuleEngine, ReadabilityBounds, RuleSet, RuleSetRegistry, Selector};
pub use scale::{HierarchyScaler, SizeChange};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const MIN_RULESET_VERSION: &str = "1.0.0";
