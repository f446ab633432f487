//! Kerning and Optical Margin Planning
//!
//! Pure planning over text content; the host applies the resulting edits.
//! Pair kerning targets specific two-character sequences (the classic AV/To
//! cases); optical margins hang leading/trailing punctuation outside the
//! text block.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A two-character sequence and the tracking to apply at each occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KerningPair {
    pub characters: String,
    /// Tracking value (thousandths of an em, host-native units).
    pub adjustment: f64,
}

/// Frame-level automatic kerning directive, applied alongside explicit pairs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AutoKernMode {
    /// Font metric kern tables.
    Metrics,
    /// Shape-driven pairwise spacing.
    Optical,
}

/// One tracking write at a character position (char index, not byte index).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEdit {
    pub char_index: usize,
    pub tracking: f64,
}

/// Scan `text` for each kerning pair and emit a tracking edit at the first
/// character of every occurrence. Pairs that are not exactly two characters
/// are skipped with a warning.
pub fn plan_pair_kerning(text: &str, pairs: &[KerningPair]) -> Vec<TrackingEdit> {
    let chars: Vec<char> = text.chars().collect();
    let mut edits = Vec::new();

    for pair in pairs {
        let target: Vec<char> = pair.characters.chars().collect();
        if target.len() != 2 {
            warn!(pair = %pair.characters, "skipping kerning pair that is not two characters");
            continue;
        }
        for (i, window) in chars.windows(2).enumerate() {
            if window[0] == target[0] && window[1] == target[1] {
                edits.push(TrackingEdit {
                    char_index: i,
                    tracking: pair.adjustment,
                });
            }
        }
    }

    edits.sort_by_key(|e| e.char_index);
    edits
}

/// Punctuation that should hang outside the optical text edge.
const HANGING_PUNCTUATION: &[char] = &['"', '\'', '-', '.', ',', ';', ':', '!', '?'];

/// Indent corrections for one paragraph, in points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarginEdit {
    pub paragraph: usize,
    pub first_line_indent_delta: f64,
    pub right_indent_delta: f64,
}

/// Hang leading/trailing punctuation by pulling the respective indent out by
/// `margin_adjustment` inches (converted to points). Paragraphs without edge
/// punctuation produce no edit.
pub fn plan_optical_margins(paragraphs: &[&str], margin_adjustment: f64) -> Vec<MarginEdit> {
    let delta = -margin_adjustment * 72.0;
    let mut edits = Vec::new();

    for (i, paragraph) in paragraphs.iter().enumerate() {
        let first = paragraph.chars().next();
        let last = paragraph.chars().last();

        let hang_first = first.map_or(false, |c| HANGING_PUNCTUATION.contains(&c));
        let hang_last = last.map_or(false, |c| HANGING_PUNCTUATION.contains(&c));

        if hang_first || hang_last {
            edits.push(MarginEdit {
                paragraph: i,
                first_line_indent_delta: if hang_first { delta } else { 0.0 },
                right_indent_delta: if hang_last { delta } else { 0.0 },
            });
        }
    }

    edits
}
