//! Hierarchy Scaler - Geometric Type Scale
//!
//! Recomputes font sizes so the selection forms a geometric progression
//! from the previously-largest element down to the previously-smallest,
//! independent of the original absolute sizes.

use serde::{Deserialize, Serialize};

use crate::elements::TextElement;
use crate::host::{HostDocument, PropertyWrite};
use tracing::warn;

pub const DEFAULT_SCALE_RATIO: f64 = 1.25;

/// Before/after size pair, reported per original element index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SizeChange {
    pub index: usize,
    pub old_size: f64,
    pub new_size: f64,
}

pub struct HierarchyScaler;

impl HierarchyScaler {
    /// Assign `base_size * ratio^(n-1-k)` to the element ranked `k` by
    /// current size (0 = largest). Ties keep original order, which makes a
    /// second pass with the same parameters a no-op. Without a base size,
    /// sizes are left unchanged.
    pub fn rescale(
        elements: &[TextElement],
        base_size: Option<f64>,
        scale_ratio: f64,
    ) -> Vec<SizeChange> {
        let n = elements.len();
        let mut ranked: Vec<(usize, f64)> = elements
            .iter()
            .enumerate()
            .map(|(i, e)| (i, e.font_size))
            .collect();
        // Stable sort: equal sizes keep their original relative order.
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut changes: Vec<SizeChange> = elements
            .iter()
            .enumerate()
            .map(|(index, e)| SizeChange {
                index,
                old_size: e.font_size,
                new_size: e.font_size,
            })
            .collect();

        if let Some(base) = base_size {
            for (rank, (index, old_size)) in ranked.iter().enumerate() {
                let exponent = (n - 1 - rank) as i32;
                changes[*index] = SizeChange {
                    index: *index,
                    old_size: *old_size,
                    new_size: base * scale_ratio.powi(exponent),
                };
            }
        }

        changes
    }

    /// Rescale and write the new sizes back through the host. Failed writes
    /// are logged and skipped.
    pub fn apply<H: HostDocument>(
        host: &mut H,
        elements: &[TextElement],
        base_size: Option<f64>,
        scale_ratio: f64,
    ) -> Vec<SizeChange> {
        let changes = Self::rescale(elements, base_size, scale_ratio);
        for change in &changes {
            if change.new_size != change.old_size {
                if let Err(e) = host.apply(change.index, &PropertyWrite::FontSize(change.new_size))
                {
                    warn!(index = change.index, "skipping size write: {e}");
                }
            }
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Bounds, FontWeight};

    fn element(font_size: f64) -> TextElement {
        TextElement {
            family: "Helvetica".to_string(),
            font_size,
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
    fn builds_geometric_progression_largest_to_smallest() {
        let elements = vec![element(24.0), element(18.0), element(12.0)];
        let changes = HierarchyScaler::rescale(&elements, Some(12.0), 1.25);
        // 12 * 1.25^2, 12 * 1.25^1, 12 * 1.25^0
        assert_eq!(changes[0].new_size, 18.75);
        assert_eq!(changes[1].new_size, 15.0);
        assert_eq!(changes[2].new_size, 12.0);
        assert_eq!(changes[0].old_size, 24.0);
    }

    #[test]
    fn ranking_follows_size_not_position() {
        let elements = vec![element(10.0), element(40.0), element(20.0)];
        let changes = HierarchyScaler::rescale(&elements, Some(10.0), 2.0);
        assert_eq!(changes[0].new_size, 10.0); // smallest -> base
        assert_eq!(changes[1].new_size, 40.0); // largest -> base * 2^2
        assert_eq!(changes[2].new_size, 20.0);
    }

    #[test]
    fn no_base_size_leaves_sizes_unchanged() {
        let elements = vec![element(24.0), element(12.0)];
        let changes = HierarchyScaler::rescale(&elements, None, 1.25);
        assert_eq!(changes[0].new_size, 24.0);
        assert_eq!(changes[1].new_size, 12.0);
    }

    #[test]
    fn rescale_is_idempotent_on_its_own_output() {
        let elements = vec![element(14.0), element(14.0), element(30.0)];
        let first = HierarchyScaler::rescale(&elements, Some(12.0), 1.25);

        let rescaled: Vec<TextElement> = first.iter().map(|c| element(c.new_size)).collect();
        let second = HierarchyScaler::rescale(&rescaled, Some(12.0), 1.25);

        // Equal-size ties break by original order on the first pass, which
        // makes the ranking stable from then on.
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.new_size, b.new_size);
        }
    }

    #[test]
    fn empty_and_singleton_selections_are_fine() {
        assert!(HierarchyScaler::rescale(&[], Some(12.0), 1.25).is_empty());
        let changes = HierarchyScaler::rescale(&[element(20.0)], Some(12.0), 1.25);
        assert_eq!(changes[0].new_size, 12.0); // single element gets the base
    }

    #[test]
    fn apply_writes_through_host() {
        use crate::host::SnapshotHost;
        let elements = vec![element(24.0), element(12.0)];
        let mut host = SnapshotHost::new(elements.clone());
        HierarchyScaler::apply(&mut host, &elements, Some(10.0), 1.5);
        assert_eq!(host.elements()[0].font_size, 15.0);
        assert_eq!(host.elements()[1].font_size, 10.0);
    }
}
