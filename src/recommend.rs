//! Recommendation Aggregation
//!
//! Merges analyzer results into a prioritized action list. Tiers are
//! independent booleans keyed on error/warning presence; at most one
//! recommendation per tier.

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisResult, ResultKind};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub priority: Priority,
    pub message: String,
    /// Machine-readable action label for the UI collaborator.
    pub action: String,
}

/// Partition results by kind and emit per-tier recommendations.
pub fn aggregate(results: &[AnalysisResult]) -> Vec<Recommendation> {
    let errors = results.iter().filter(|r| r.kind == ResultKind::Error).count();
    let warnings = results
        .iter()
        .filter(|r| r.kind == ResultKind::Warning)
        .count();

    let mut recommendations = Vec::new();

    if errors > 0 {
        recommendations.push(Recommendation {
            priority: Priority::High,
            message: format!(
                "{errors} typography error{} found - resolve these first",
                plural(errors)
            ),
            action: "resolve-errors".to_string(),
        });
    }

    if warnings > 0 {
        recommendations.push(Recommendation {
            priority: Priority::Medium,
            message: format!(
                "{warnings} warning{} worth reviewing once errors are cleared",
                plural(warnings)
            ),
            action: "review-warnings".to_string(),
        });
    }

    if errors == 0 && warnings == 0 {
        recommendations.push(Recommendation {
            priority: Priority::Low,
            message: "Typography looks good - no corrections needed".to_string(),
            action: "none".to_string(),
        });
    }

    recommendations
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
