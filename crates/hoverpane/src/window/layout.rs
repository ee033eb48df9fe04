//! Primary window sizing driven by the number of docked widgets.
//!
//! The engine is pure: it turns a docked-count transition and the current
//! primary frame into a [`LayoutPlan`], which the coordinator applies to the
//! backend and the store. Every plan keeps `frame.y` (the top edge) where it
//! was; only the bottom edge moves.

use hoverpane_core::logging::targets;
use hoverpane_core::{Rect, Size};

/// Height parameters of the primary window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    /// Minimum height with nothing docked.
    pub base_min_height: f64,
    /// Height added for each docked widget.
    pub per_widget_height: f64,
    /// Minimum width of the primary window.
    pub min_width: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            base_min_height: 80.0,
            per_widget_height: 56.0,
            min_width: 120.0,
        }
    }
}

impl LayoutMetrics {
    /// Minimum height with `docked` widgets attached.
    pub fn min_height(&self, docked: usize) -> f64 {
        self.base_min_height + docked as f64 * self.per_widget_height
    }

    /// Minimum size with `docked` widgets attached.
    pub fn min_size(&self, docked: usize) -> Size {
        Size::new(self.min_width, self.min_height(docked))
    }
}

/// What the coordinator must do after a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutPlan {
    /// New frame of the primary window.
    pub frame: Rect,
    /// New minimum size of the primary window.
    pub min_size: Size,
    /// Size to persist as the pre-dock size, on a `0 -> n` transition.
    pub snapshot: Option<Size>,
}

/// State machine over the docked-widget count.
#[derive(Debug, Clone)]
pub struct PrimaryLayoutEngine {
    metrics: LayoutMetrics,
    docked_count: usize,
}

impl PrimaryLayoutEngine {
    pub fn new(metrics: LayoutMetrics) -> Self {
        Self {
            metrics,
            docked_count: 0,
        }
    }

    pub fn metrics(&self) -> LayoutMetrics {
        self.metrics
    }

    pub fn docked_count(&self) -> usize {
        self.docked_count
    }

    /// Adopt `count` at startup without treating it as a transition.
    ///
    /// The restored frame is only grown if it is below the minimum; no
    /// pre-dock snapshot is taken because the saved size already is one.
    pub fn initialize(&mut self, count: usize, current: Rect) -> LayoutPlan {
        self.docked_count = count;
        let min_height = self.metrics.min_height(count);
        LayoutPlan {
            frame: current.with_height_top_anchored(current.height().max(min_height)),
            min_size: self.metrics.min_size(count),
            snapshot: None,
        }
    }

    /// Plan the primary frame after the docked count becomes `count`.
    ///
    /// `pre_dock` is the persisted pre-dock size, used when the last docked
    /// widget leaves. Returns `None` when the count did not change.
    pub fn transition(&mut self, count: usize, current: Rect, pre_dock: Option<Size>) -> Option<LayoutPlan> {
        let previous = self.docked_count;
        if previous == count {
            return None;
        }
        self.docked_count = count;

        let min_size = self.metrics.min_size(count);
        let min_height = min_size.height;

        let plan = match (previous, count) {
            (0, _) => LayoutPlan {
                frame: current.with_height_top_anchored(current.height().max(min_height)),
                min_size,
                snapshot: Some(current.size),
            },
            (_, 0) => {
                let frame = match pre_dock {
                    Some(pre) => current.with_size(Size::new(
                        pre.width.max(min_size.width),
                        pre.height.max(min_height),
                    )),
                    None => current.with_height_top_anchored(current.height().max(min_height)),
                };
                LayoutPlan {
                    frame,
                    min_size,
                    snapshot: None,
                }
            }
            (from, to) if to < from => {
                // Shrink by the height the departed widgets occupied, never
                // below the new minimum and never into height the user added.
                let removed = (from - to) as f64 * self.metrics.per_widget_height;
                let height = (current.height() - removed).max(min_height);
                LayoutPlan {
                    frame: current.with_height_top_anchored(height.min(current.height())),
                    min_size,
                    snapshot: None,
                }
            }
            _ => LayoutPlan {
                frame: current.with_height_top_anchored(current.height().max(min_height)),
                min_size,
                snapshot: None,
            },
        };

        tracing::debug!(
            target: targets::LAYOUT,
            from = previous,
            to = count,
            height = plan.frame.height(),
            "primary relayout"
        );
        Some(plan)
    }
}
