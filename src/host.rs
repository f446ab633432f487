//! Host Document Seam
//!
//! The host's live object graph is deep, mutable and externally owned. The
//! engine never holds references into it: it consumes snapshots and writes
//! corrections back as discrete property writes. A failed write on one
//! property must not abort the remaining writes for that element.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::elements::{parse_hex_rgb, TextElement};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Font not available: {0}")]
    FontUnavailable(String),

    #[error("No element at index {0}")]
    NoSuchElement(usize),

    #[error("Host rejected write: {0}")]
    Rejected(String),
}

/// One property to write onto a host-owned text element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "property", content = "value")]
pub enum PropertyWrite {
    FontFamily(String),
    /// Point size.
    FontSize(f64),
    /// Leading in points.
    LineHeight(f64),
    /// Tracking em-fraction.
    CharacterSpacing(f64),
    /// RGB hex string.
    Color(String),
}

impl PropertyWrite {
    pub fn property_name(&self) -> &'static str {
        match self {
            PropertyWrite::FontFamily(_) => "fontFamily",
            PropertyWrite::FontSize(_) => "fontSize",
            PropertyWrite::LineHeight(_) => "lineHeight",
            PropertyWrite::CharacterSpacing(_) => "characterSpacing",
            PropertyWrite::Color(_) => "color",
        }
    }
}

/// Mutation interface onto the host document.
pub trait HostDocument {
    /// Apply a single property write to the element at `index`.
    fn apply(&mut self, index: usize, write: &PropertyWrite) -> Result<(), HostError>;
}

/// In-memory host over owned snapshots. Backs the CLI bridge (which plans
/// against a snapshot and returns the resulting elements to the panel) and
/// the engine tests.
pub struct SnapshotHost {
    elements: Vec<TextElement>,
    /// Families the simulated environment can resolve; None resolves all.
    available_fonts: Option<Vec<String>>,
}

impl SnapshotHost {
    pub fn new(elements: Vec<TextElement>) -> Self {
        Self {
            elements,
            available_fonts: None,
        }
    }

    /// Restrict resolvable font families, mimicking a host environment with
    /// a limited font set.
    pub fn with_fonts(elements: Vec<TextElement>, fonts: Vec<String>) -> Self {
        Self {
            elements,
            available_fonts: Some(fonts),
        }
    }

    pub fn elements(&self) -> &[TextElement] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<TextElement> {
        self.elements
    }
}

impl HostDocument for SnapshotHost {
    fn apply(&mut self, index: usize, write: &PropertyWrite) -> Result<(), HostError> {
        let el = self
            .elements
            .get_mut(index)
            .ok_or(HostError::NoSuchElement(index))?;

        match write {
            PropertyWrite::FontFamily(family) => {
                if let Some(fonts) = &self.available_fonts {
                    if !fonts.iter().any(|f| f.eq_ignore_ascii_case(family)) {
                        return Err(HostError::FontUnavailable(family.clone()));
                    }
                }
                el.family = family.clone();
            }
            PropertyWrite::FontSize(size) => el.font_size = *size,
            PropertyWrite::LineHeight(leading) => el.line_height = *leading,
            PropertyWrite::CharacterSpacing(tracking) => el.character_spacing = *tracking,
            PropertyWrite::Color(color) => {
                if parse_hex_rgb(color).is_none() {
                    return Err(HostError::Rejected(format!("invalid color {color}")));
                }
                el.color = color.clone();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Bounds, FontWeight};

    fn element() -> TextElement {
        TextElement {
            family: "Helvetica".to_string(),
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
    fn snapshot_host_applies_writes() {
        let mut host = SnapshotHost::new(vec![element()]);
        host.apply(0, &PropertyWrite::FontSize(18.0)).unwrap();
        host.apply(0, &PropertyWrite::Color("#ff0000".to_string()))
            .unwrap();
        assert_eq!(host.elements()[0].font_size, 18.0);
        assert_eq!(host.elements()[0].color, "#ff0000");
    }

    #[test]
    fn restricted_font_set_rejects_unknown_family() {
        let mut host =
            SnapshotHost::with_fonts(vec![element()], vec!["Georgia".to_string()]);
        let err = host
            .apply(0, &PropertyWrite::FontFamily("Comic Sans MS".to_string()))
            .unwrap_err();
        assert!(matches!(err, HostError::FontUnavailable(_)));
        // Element untouched by the failed write.
        assert_eq!(host.elements()[0].family, "Helvetica");
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let mut host = SnapshotHost::new(vec![element()]);
        let err = host.apply(3, &PropertyWrite::FontSize(10.0)).unwrap_err();
        assert!(matches!(err, HostError::NoSuchElement(3)));
    }
}
