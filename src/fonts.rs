//! Font Classification and Pairing Analysis
//!
//! Families are mapped to four coarse categories by case-insensitive
//! substring matching against curated name lists, with a keyword fallback.
//! Pairing verdicts depend only on the multiset of family names.

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisResult, Category, ResultKind};
use crate::elements::TextElement;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum FontCategory {
    Serif,
    SansSerif,
    Script,
    Monospace,
}

impl FontCategory {
    pub fn label(self) -> &'static str {
        match self {
            FontCategory::Serif => "serif",
            FontCategory::SansSerif => "sans-serif",
            FontCategory::Script => "script",
            FontCategory::Monospace => "monospace",
        }
    }
}

const SERIF_FAMILIES: &[&str] = &[
    "times", "georgia", "minion", "garamond", "baskerville", "caslon",
];
const SANS_FAMILIES: &[&str] = &[
    "helvetica", "arial", "futura", "avenir", "proxima", "gotham",
];
const SCRIPT_FAMILIES: &[&str] = &["brush", "handwriting", "calligraphy", "zapfino", "pacifico"];
const MONO_FAMILIES: &[&str] = &["courier", "monaco", "consolas", "menlo", "source code"];

/// Map a family name onto one of the four categories.
pub fn categorize_family(family: &str) -> FontCategory {
    let name = family.to_lowercase();

    let matches = |list: &[&str]| list.iter().any(|f| name.contains(f));

    if matches(SERIF_FAMILIES) {
        return FontCategory::Serif;
    }
    if matches(SANS_FAMILIES) {
        return FontCategory::SansSerif;
    }
    if matches(SCRIPT_FAMILIES) {
        return FontCategory::Script;
    }
    if matches(MONO_FAMILIES) {
        return FontCategory::Monospace;
    }

    // Keyword fallback for families outside the curated lists.
    if name.contains("mono") || name.contains("courier") {
        FontCategory::Monospace
    } else if name.contains("script") || name.contains("italic") {
        FontCategory::Script
    } else if name.contains("sans") || name.contains("arial") || name.contains("helvetica") {
        FontCategory::SansSerif
    } else if name.contains("serif") {
        FontCategory::Serif
    } else {
        FontCategory::SansSerif
    }
}

/// Scores font diversity and conflict across a selection.
pub struct FontPairingAnalyzer;

impl FontPairingAnalyzer {
    /// Returns at most one result for the whole selection; None when there
    /// is nothing to pair (fewer than two distinct families).
    pub fn analyze(elements: &[TextElement]) -> Option<AnalysisResult> {
        let mut families: Vec<&str> = Vec::new();
        for el in elements {
            if !families.iter().any(|f| f.eq_ignore_ascii_case(&el.family)) {
                families.push(&el.family);
            }
        }
        if families.len() < 2 {
            return None;
        }

        let categories: Vec<FontCategory> =
            families.iter().map(|f| categorize_family(f)).collect();

        let script_count = categories
            .iter()
            .filter(|c| **c == FontCategory::Script)
            .count();

        let mut distinct: Vec<FontCategory> = Vec::new();
        for c in &categories {
            if !distinct.contains(c) {
                distinct.push(*c);
            }
        }

        if distinct.len() == 1 {
            let shared = distinct[0];
            return Some(AnalysisResult {
                kind: ResultKind::Warning,
                category: Category::FontPairing,
                message: format!(
                    "All {} fonts in the selection are {}",
                    families.len(),
                    shared.label()
                ),
                suggestions: vec![format!(
                    "Pair the {} family with a contrasting category to add distinction",
                    shared.label()
                )],
                severity: None,
                auto_fix_available: Some(true),
            });
        }

        // Script-on-script is a conflict regardless of what else is present.
        if script_count > 1 {
            return Some(AnalysisResult {
                kind: ResultKind::Error,
                category: Category::FontPairing,
                message: format!(
                    "{script_count} script fonts compete for attention in the selection"
                ),
                suggestions: vec![
                    "Keep a single script font and move the others to a serif or sans-serif"
                        .to_string(),
                ],
                severity: None,
                auto_fix_available: Some(true),
            });
        }

        let listed: Vec<&str> = distinct.iter().map(|c| c.label()).collect();
        Some(AnalysisResult {
            kind: ResultKind::Success,
            category: Category::FontPairing,
            message: format!("Font pairing combines {}", listed.join(" + ")),
            suggestions: vec![],
            severity: None,
            auto_fix_available: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Bounds, FontWeight};

    fn element(family: &str) -> TextElement {
        TextElement {
            family: family.to_string(),
            font_size: 12.0,
            font_weight: FontWeight::Regular,
            line_height: 1.4,
            character_spacing: 0.0,
            color: "#000000".to_string(),
            text: String::new(),
            line_length: None,
            bounds: Bounds::default(),
            overflowed: false,
        }
    }

    #[test]
    fn categorizes_curated_families() {
        assert_eq!(categorize_family("Times New Roman"), FontCategory::Serif);
        assert_eq!(categorize_family("Helvetica Neue"), FontCategory::SansSerif);
        assert_eq!(categorize_family("Brush Script MT"), FontCategory::Script);
        assert_eq!(categorize_family("Courier New"), FontCategory::Monospace);
    }

    #[test]
    fn fallback_heuristic_covers_unknown_names() {
        assert_eq!(categorize_family("IBM Plex Mono"), FontCategory::Monospace);
        assert_eq!(categorize_family("Liberation Sans"), FontCategory::SansSerif);
        assert_eq!(categorize_family("PT Serif"), FontCategory::Serif);
        assert_eq!(categorize_family("Edwardian Script"), FontCategory::Script);
        assert_eq!(categorize_family("Roboto"), FontCategory::SansSerif);
    }

    #[test]
    fn single_family_yields_no_result() {
        let elements = vec![element("Helvetica"), element("Helvetica")];
        assert!(FontPairingAnalyzer::analyze(&elements).is_none());
        assert!(FontPairingAnalyzer::analyze(&[]).is_none());
    }

    #[test]
    fn shared_category_is_a_warning() {
        let elements = vec![element("Georgia"), element("Garamond")];
        let result = FontPairingAnalyzer::analyze(&elements).unwrap();
        assert_eq!(result.kind, ResultKind::Warning);
        assert_eq!(result.category, Category::FontPairing);
        assert!(result.message.contains("serif"));
        assert!(!result.suggestions.is_empty());
    }

    #[test]
    fn script_on_script_is_an_error_despite_other_categories() {
        let elements = vec![
            element("Brush Script MT"),
            element("Pacifico"),
            element("Helvetica"),
        ];
        let result = FontPairingAnalyzer::analyze(&elements).unwrap();
        assert_eq!(result.kind, ResultKind::Error);
        assert!(!result.suggestions.is_empty());
    }

    #[test]
    fn contrasting_categories_succeed() {
        let elements = vec![element("Georgia"), element("Futura")];
        let result = FontPairingAnalyzer::analyze(&elements).unwrap();
        assert_eq!(result.kind, ResultKind::Success);
        assert!(result.message.contains("serif"));
        assert!(result.message.contains("sans-serif"));
    }

    #[test]
    fn verdict_ignores_family_case() {
        let a = FontPairingAnalyzer::analyze(&[element("GEORGIA"), element("georgia")]);
        assert!(a.is_none());
    }
}
