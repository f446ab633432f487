//! Auto-Fit Solver - Bounded Shrink/Grow Search
//!
//! Text reflow is opaque to this layer: the only signal is a host-provided
//! overflow probe, queried after every size write. The solver converges to
//! *a* non-overflowing size near the bound, not the theoretical maximum.
//! Iteration caps guarantee termination regardless of probe behavior.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::elements::Bounds;

/// Per-phase iteration cap. Total probe calls are bounded by twice this.
pub const MAX_ITERATIONS: u32 = 20;

const SHRINK_STEP: f64 = 0.95;
const GROW_STEP: f64 = 1.05;

#[derive(Debug, Error)]
pub enum AutoFitError {
    #[error("baseFontSize {0} exceeds maxFontSize {1}")]
    InvertedSizeBounds(f64, f64),
}

/// A live text frame in the host document. `overflowed` is a side-effecting
/// query: the host reflows at the current size before answering.
pub trait TextFrame {
    fn font_size(&self) -> f64;
    fn set_font_size(&mut self, size: f64);
    fn overflowed(&mut self) -> bool;
    fn bounds(&self) -> Bounds;
    fn set_bounds(&mut self, bounds: Bounds);
}

/// Explicit absolute frame overrides, applied after auto-fit.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameAdjustment {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub left: Option<f64>,
    #[serde(default)]
    pub top: Option<f64>,
}

impl FrameAdjustment {
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none() && self.left.is_none() && self.top.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentParams {
    #[serde(default = "default_base_font_size")]
    pub base_font_size: f64,
    #[serde(default = "default_max_font_size")]
    pub max_font_size: f64,
    #[serde(default = "default_true")]
    pub auto_fit: bool,
    /// Per-frame-index overrides, applied after the fit.
    #[serde(default)]
    pub adjustments: Vec<FrameAdjustment>,
}

fn default_base_font_size() -> f64 {
    12.0
}
fn default_max_font_size() -> f64 {
    72.0
}
fn default_true() -> bool {
    true
}

impl Default for AdjustmentParams {
    fn default() -> Self {
        Self {
            base_font_size: default_base_font_size(),
            max_font_size: default_max_font_size(),
            auto_fit: true,
            adjustments: Vec::new(),
        }
    }
}

/// Frame state snapshot reported before and after a fit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameState {
    pub bounds: Bounds,
    pub font_size: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitResult {
    pub index: usize,
    pub success: bool,
    pub original: FrameState,
    #[serde(rename = "final")]
    pub final_state: FrameState,
}

pub struct AutoFitSolver;

impl AutoFitSolver {
    /// Fit a single frame. Two bounded phases: shrink by 5% while the frame
    /// overflows, then grow by 5% (clamped to the maximum) while it fits,
    /// reverting the last grow step if it tipped the frame into overflow.
    pub fn fit_frame<F: TextFrame>(
        frame: &mut F,
        index: usize,
        params: &AdjustmentParams,
    ) -> Result<FitResult, AutoFitError> {
        if params.base_font_size > params.max_font_size {
            return Err(AutoFitError::InvertedSizeBounds(
                params.base_font_size,
                params.max_font_size,
            ));
        }

        let original = FrameState {
            bounds: frame.bounds(),
            font_size: frame.font_size(),
        };

        let mut fits = true;
        if params.auto_fit {
            let mut size = params.base_font_size;
            frame.set_font_size(size);

            // Shrink phase: at most MAX_ITERATIONS probes.
            for _ in 0..MAX_ITERATIONS {
                if !frame.overflowed() {
                    fits = true;
                    break;
                }
                fits = false;
                size *= SHRINK_STEP;
                frame.set_font_size(size);
            }

            // Grow phase: at most MAX_ITERATIONS probes. A grow step that
            // tips the frame into overflow is reverted and ends the search.
            // The revert is clamped to the shrink floor so the final size
            // stays inside [base * 0.95^MAX_ITERATIONS, max].
            let floor = params.base_font_size * SHRINK_STEP.powi(MAX_ITERATIONS as i32);
            let mut grew = false;
            for _ in 0..MAX_ITERATIONS {
                if frame.overflowed() {
                    fits = grew;
                    if grew {
                        size = (size * SHRINK_STEP).max(floor);
                        frame.set_font_size(size);
                    }
                    break;
                }
                fits = true;
                if size >= params.max_font_size {
                    break;
                }
                size = (size * GROW_STEP).min(params.max_font_size);
                frame.set_font_size(size);
                grew = true;
            }

            debug!(index, size, fits, "auto-fit converged");
        }

        // Explicit overrides win over the computed positioning.
        if let Some(adjustment) = params.adjustments.get(index) {
            if !adjustment.is_empty() {
                let mut bounds = frame.bounds();
                if let Some(w) = adjustment.width {
                    bounds.width = w;
                }
                if let Some(h) = adjustment.height {
                    bounds.height = h;
                }
                if let Some(l) = adjustment.left {
                    bounds.left = l;
                }
                if let Some(t) = adjustment.top {
                    bounds.top = t;
                }
                frame.set_bounds(bounds);
            }
        }

        Ok(FitResult {
            index,
            success: fits,
            original,
            final_state: FrameState {
                bounds: frame.bounds(),
                font_size: frame.font_size(),
            },
        })
    }

    /// Fit every frame in a selection with shared parameters.
    pub fn fit_all<F: TextFrame>(
        frames: &mut [F],
        params: &AdjustmentParams,
    ) -> Result<Vec<FitResult>, AutoFitError> {
        frames
            .iter_mut()
            .enumerate()
            .map(|(index, frame)| Self::fit_frame(frame, index, params))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Frame with a capacity model: overflows when font_size exceeds the
    /// capacity threshold. Counts probe calls.
    struct FakeFrame {
        font_size: f64,
        bounds: Bounds,
        capacity: f64,
        probes: u32,
    }

    impl FakeFrame {
        fn new(capacity: f64) -> Self {
            Self {
                font_size: 12.0,
                bounds: Bounds {
                    left: 0.0,
                    top: 0.0,
                    width: 100.0,
                    height: 50.0,
                },
                capacity,
                probes: 0,
            }
        }
    }

    impl TextFrame for FakeFrame {
        fn font_size(&self) -> f64 {
            self.font_size
        }
        fn set_font_size(&mut self, size: f64) {
            self.font_size = size;
        }
        fn overflowed(&mut self) -> bool {
            self.probes += 1;
            self.font_size > self.capacity
        }
        fn bounds(&self) -> Bounds {
            self.bounds
        }
        fn set_bounds(&mut self, bounds: Bounds) {
            self.bounds = bounds;
        }
    }

    #[test]
    fn shrinks_until_the_frame_fits() {
        let mut frame = FakeFrame::new(10.0);
        let params = AdjustmentParams::default();
        let result = AutoFitSolver::fit_frame(&mut frame, 0, &params).unwrap();
        assert!(result.success);
        assert!(frame.font_size <= 10.0);
        assert!(frame.font_size >= 12.0 * 0.95_f64.powi(MAX_ITERATIONS as i32));
    }

    #[test]
    fn overshoot_revert_from_the_shrink_floor_stays_at_the_floor() {
        // Capacity barely above the shrink floor: the full shrink budget is
        // spent, the first grow step overflows, and the revert must land on
        // the floor instead of 0.9975x the floor.
        let floor = 12.0 * SHRINK_STEP.powi(MAX_ITERATIONS as i32);
        let mut frame = FakeFrame::new(floor * 1.02);
        let params = AdjustmentParams::default();
        let result = AutoFitSolver::fit_frame(&mut frame, 0, &params).unwrap();
        assert!(result.success);
        assert!(result.final_state.font_size >= floor);
        assert!(result.final_state.font_size <= floor * 1.02);
    }

    #[test]
    fn grows_toward_the_capacity_and_reverts_the_overshoot() {
        let mut frame = FakeFrame::new(16.0);
        let params = AdjustmentParams::default();
        let result = AutoFitSolver::fit_frame(&mut frame, 0, &params).unwrap();
        assert!(result.success);
        // Ends at a fitting size near the capacity: one corrective shrink
        // below the first overflowing grow step.
        assert!(frame.font_size <= 16.0);
        assert!(frame.font_size > 16.0 * 0.95 * 0.95);
    }

    #[test]
    fn never_exceeds_max_font_size() {
        let mut frame = FakeFrame::new(1000.0); // never overflows
        let params = AdjustmentParams {
            base_font_size: 60.0,
            max_font_size: 72.0,
            ..AdjustmentParams::default()
        };
        let result = AutoFitSolver::fit_frame(&mut frame, 0, &params).unwrap();
        assert!(result.success);
        assert!(frame.font_size <= 72.0);
    }

    #[test]
    fn probe_budget_is_bounded_even_when_nothing_fits() {
        let mut frame = FakeFrame::new(0.1); // always overflows
        let params = AdjustmentParams::default();
        let result = AutoFitSolver::fit_frame(&mut frame, 0, &params).unwrap();
        assert!(!result.success);
        assert!(frame.probes <= 2 * MAX_ITERATIONS);
        // Shrink floor honored.
        assert!(frame.font_size >= 12.0 * 0.95_f64.powi(MAX_ITERATIONS as i32) - 1e-9);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let mut frame = FakeFrame::new(10.0);
        let params = AdjustmentParams {
            base_font_size: 72.0,
            max_font_size: 12.0,
            ..AdjustmentParams::default()
        };
        assert!(AutoFitSolver::fit_frame(&mut frame, 0, &params).is_err());
    }

    #[test]
    fn explicit_adjustments_apply_after_the_fit() {
        let mut frame = FakeFrame::new(10.0);
        let params = AdjustmentParams {
            adjustments: vec![FrameAdjustment {
                width: Some(300.0),
                left: Some(25.0),
                ..FrameAdjustment::default()
            }],
            ..AdjustmentParams::default()
        };
        let result = AutoFitSolver::fit_frame(&mut frame, 0, &params).unwrap();
        assert_eq!(result.final_state.bounds.width, 300.0);
        assert_eq!(result.final_state.bounds.left, 25.0);
        assert_eq!(result.final_state.bounds.height, 50.0); // untouched
        assert_eq!(result.original.bounds.width, 100.0);
    }

    #[test]
    fn adjustments_apply_even_without_auto_fit() {
        let mut frame = FakeFrame::new(10.0);
        let params = AdjustmentParams {
            auto_fit: false,
            adjustments: vec![FrameAdjustment {
                height: Some(90.0),
                ..FrameAdjustment::default()
            }],
            ..AdjustmentParams::default()
        };
        let result = AutoFitSolver::fit_frame(&mut frame, 0, &params).unwrap();
        assert_eq!(frame.font_size, 12.0); // size untouched
        assert_eq!(result.final_state.bounds.height, 90.0);
        assert_eq!(frame.probes, 0);
    }

    #[test]
    fn fit_all_indexes_adjustments_per_frame() {
        let mut frames = vec![FakeFrame::new(10.0), FakeFrame::new(20.0)];
        let params = AdjustmentParams {
            adjustments: vec![
                FrameAdjustment::default(),
                FrameAdjustment {
                    top: Some(5.0),
                    ..FrameAdjustment::default()
                },
            ],
            ..AdjustmentParams::default()
        };
        let results = AutoFitSolver::fit_all(&mut frames, &params).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].final_state.bounds.top, 5.0);
        assert_eq!(results[0].final_state.bounds.top, 0.0);
    }
}
