//! Resize and drag handling for borderless panels.
//!
//! Panels have no platform chrome, so every panel carries a
//! [`PointerController`]. A press near an edge starts a resize, a press
//! anywhere else starts a drag, and release always returns to idle.
//!
//! # Usage
//!
//! ```ignore
//! // Pointer pressed; both window-local and screen positions are needed:
//! controller.press(pos.local, pos.screen, host.frame(panel)?);
//!
//! // Pointer moved; only the screen position matters:
//! if let Some(frame) = controller.drag_to(pos.screen) {
//!     host.set_frame(panel, frame);
//! }
//!
//! // Hovering without a press:
//! host.set_cursor(panel, controller.hover(local, frame.size));
//! ```

use cursor_icon::CursorIcon;
use hoverpane_core::logging::targets;
use hoverpane_core::{Point, Rect, Size};

/// Which edge or corner a point is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResizeRegion {
    /// Body of the panel; pressing here drags.
    #[default]
    None,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeRegion {
    /// Returns `true` for any edge or corner.
    pub fn is_resize(self) -> bool {
        self != Self::None
    }

    fn moves_left(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    fn moves_right(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }

    fn moves_top(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }

    /// The resize cursor shown while hovering this region.
    pub fn cursor(self) -> CursorIcon {
        match self {
            Self::None => CursorIcon::Default,
            Self::Top | Self::Bottom => CursorIcon::NsResize,
            Self::Left | Self::Right => CursorIcon::EwResize,
            Self::TopLeft | Self::BottomRight => CursorIcon::NwseResize,
            Self::TopRight | Self::BottomLeft => CursorIcon::NeswResize,
        }
    }
}

/// Hit-test dimensions for the invisible resize border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromeMetrics {
    /// Width of the edge band. Wider than a platform border because there is
    /// no visible frame to aim for.
    pub edge_thickness: f64,
    /// Length of the corner zones along each edge.
    pub corner_size: f64,
}

impl Default for ChromeMetrics {
    fn default() -> Self {
        Self {
            edge_thickness: 10.0,
            corner_size: 18.0,
        }
    }
}

impl ChromeMetrics {
    /// Classify a window-local point.
    pub fn classify(&self, point: Point, size: Size) -> ResizeRegion {
        let Point { x, y } = point;
        if x < 0.0 || y < 0.0 || x >= size.width || y >= size.height {
            return ResizeRegion::None;
        }

        let border = self.edge_thickness;
        let corner = self.corner_size.max(border);

        let on_left = x < border;
        let on_right = x >= size.width - border;
        let on_top = y < border;
        let on_bottom = y >= size.height - border;

        let in_left_corner = x < corner;
        let in_right_corner = x >= size.width - corner;
        let in_top_corner = y < corner;
        let in_bottom_corner = y >= size.height - corner;

        // Corners take precedence over edges.
        if on_top && in_left_corner || on_left && in_top_corner {
            return ResizeRegion::TopLeft;
        }
        if on_top && in_right_corner || on_right && in_top_corner {
            return ResizeRegion::TopRight;
        }
        if on_bottom && in_left_corner || on_left && in_bottom_corner {
            return ResizeRegion::BottomLeft;
        }
        if on_bottom && in_right_corner || on_right && in_bottom_corner {
            return ResizeRegion::BottomRight;
        }

        if on_top {
            ResizeRegion::Top
        } else if on_bottom {
            ResizeRegion::Bottom
        } else if on_left {
            ResizeRegion::Left
        } else if on_right {
            ResizeRegion::Right
        } else {
            ResizeRegion::None
        }
    }
}

/// What the controller is doing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Moving the panel.
    Dragging { start_frame: Rect, start_pointer: Point },
    /// Resizing from `region`.
    Resizing {
        region: ResizeRegion,
        start_frame: Rect,
        start_pointer: Point,
    },
}

/// Per-panel pointer state machine.
#[derive(Debug, Clone)]
pub struct PointerController {
    metrics: ChromeMetrics,
    min_size: Size,
    max_size: Size,
    gesture: Gesture,
}

impl PointerController {
    /// Create an idle controller.
    pub fn new(metrics: ChromeMetrics, min_size: Size, max_size: Size) -> Self {
        Self {
            metrics,
            min_size,
            max_size,
            gesture: Gesture::Idle,
        }
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_active(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    /// Change the minimum size. Takes effect on the next pointer move.
    pub fn set_min_size(&mut self, size: Size) {
        self.min_size = size;
    }

    /// Start a gesture for a press at window-local `local`, screen position
    /// `screen`, on a panel whose current frame is `frame`.
    ///
    /// Gestures track the pointer in screen coordinates; `frame` is only
    /// read here, at the start.
    pub fn press(&mut self, local: Point, screen: Point, frame: Rect) -> Gesture {
        let start_pointer = screen;
        let region = self.metrics.classify(local, frame.size);

        self.gesture = if region.is_resize() {
            Gesture::Resizing {
                region,
                start_frame: frame,
                start_pointer,
            }
        } else {
            Gesture::Dragging {
                start_frame: frame,
                start_pointer,
            }
        };
        tracing::trace!(target: targets::CHROME, gesture = ?self.gesture, "pointer pressed");
        self.gesture
    }

    /// Compute the new frame for the pointer at screen position `pointer`.
    ///
    /// Returns `None` while idle.
    pub fn drag_to(&self, pointer: Point) -> Option<Rect> {
        match self.gesture {
            Gesture::Idle => None,
            Gesture::Dragging {
                start_frame,
                start_pointer,
            } => {
                let delta = pointer.delta_from(start_pointer);
                Some(start_frame.with_origin(start_frame.origin.offset(delta)))
            }
            Gesture::Resizing {
                region,
                start_frame,
                start_pointer,
            } => Some(self.resize(region, start_frame, pointer.delta_from(start_pointer))),
        }
    }

    fn resize(&self, region: ResizeRegion, start: Rect, delta: Point) -> Rect {
        let mut width = start.width();
        let mut height = start.height();
        if region.moves_left() {
            width -= delta.x;
        } else if region.moves_right() {
            width += delta.x;
        }
        if region.moves_top() {
            height -= delta.y;
        } else if region.moves_bottom() {
            height += delta.y;
        }

        let size = Size::new(width, height).clamp(self.min_size, self.max_size);

        // The edge opposite the dragged one is the anchor.
        let x = if region.moves_left() {
            start.right() - size.width
        } else {
            start.left()
        };
        let y = if region.moves_top() {
            start.bottom() - size.height
        } else {
            start.top()
        };
        Rect::new(x, y, size.width, size.height)
    }

    /// End whatever gesture is active. Always leaves the controller idle.
    pub fn release(&mut self) -> Gesture {
        let ended = std::mem::take(&mut self.gesture);
        if ended != Gesture::Idle {
            tracing::trace!(target: targets::CHROME, gesture = ?ended, "pointer released");
        }
        ended
    }

    /// Cursor for a hover at window-local `local` without a press.
    pub fn hover(&self, local: Point, size: Size) -> CursorIcon {
        self.metrics.classify(local, size).cursor()
    }

    /// Cursor after the pointer leaves the panel.
    pub fn leave(&self) -> CursorIcon {
        CursorIcon::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> PointerController {
        PointerController::new(
            ChromeMetrics::default(),
            Size::new(100.0, 50.0),
            Size::new(1000.0, 800.0),
        )
    }

    const FRAME: Rect = Rect::new(100.0, 100.0, 300.0, 200.0);

    fn press(c: &mut PointerController, local: Point) -> Gesture {
        c.press(local, FRAME.origin.offset(local), FRAME)
    }

    #[test]
    fn test_classify_edges_and_corners() {
        let metrics = ChromeMetrics::default();
        let size = FRAME.size;

        assert_eq!(metrics.classify(Point::new(150.0, 100.0), size), ResizeRegion::None);
        assert_eq!(metrics.classify(Point::new(150.0, 2.0), size), ResizeRegion::Top);
        assert_eq!(metrics.classify(Point::new(150.0, 195.0), size), ResizeRegion::Bottom);
        assert_eq!(metrics.classify(Point::new(3.0, 100.0), size), ResizeRegion::Left);
        assert_eq!(metrics.classify(Point::new(295.0, 100.0), size), ResizeRegion::Right);
        assert_eq!(metrics.classify(Point::new(2.0, 2.0), size), ResizeRegion::TopLeft);
        assert_eq!(metrics.classify(Point::new(15.0, 3.0), size), ResizeRegion::TopLeft);
        assert_eq!(metrics.classify(Point::new(298.0, 2.0), size), ResizeRegion::TopRight);
        assert_eq!(metrics.classify(Point::new(2.0, 198.0), size), ResizeRegion::BottomLeft);
        assert_eq!(metrics.classify(Point::new(298.0, 198.0), size), ResizeRegion::BottomRight);
        assert_eq!(metrics.classify(Point::new(-1.0, 10.0), size), ResizeRegion::None);
    }

    #[test]
    fn test_cursor_feedback() {
        let c = controller();
        assert_eq!(c.hover(Point::new(150.0, 2.0), FRAME.size), CursorIcon::NsResize);
        assert_eq!(c.hover(Point::new(2.0, 100.0), FRAME.size), CursorIcon::EwResize);
        assert_eq!(c.hover(Point::new(2.0, 2.0), FRAME.size), CursorIcon::NwseResize);
        assert_eq!(c.hover(Point::new(298.0, 2.0), FRAME.size), CursorIcon::NeswResize);
        assert_eq!(c.hover(Point::new(150.0, 100.0), FRAME.size), CursorIcon::Default);
        assert_eq!(c.leave(), CursorIcon::Default);
    }

    #[test]
    fn test_drag_translates_origin() {
        let mut c = controller();
        press(&mut c, Point::new(150.0, 100.0));
        let moved = c.drag_to(Point::new(250.0 + 40.0, 200.0 - 30.0)).unwrap();
        assert_eq!(moved.origin, Point::new(140.0, 70.0));
        assert_eq!(moved.size, FRAME.size);
    }

    #[test]
    fn test_bottom_right_resize_keeps_origin() {
        let mut c = controller();
        press(&mut c, Point::new(298.0, 198.0));
        let start = FRAME.origin.offset(Point::new(298.0, 198.0));

        for (dx, dy) in [(50.0, 20.0), (-150.0, -100.0), (900.0, 900.0)] {
            let frame = c.drag_to(start.offset(Point::new(dx, dy))).unwrap();
            assert_eq!(frame.origin, FRAME.origin);
        }
        let grown = c.drag_to(start.offset(Point::new(50.0, 20.0))).unwrap();
        assert_eq!(grown.size, Size::new(350.0, 220.0));
    }

    #[test]
    fn test_top_left_resize_anchors_bottom_right() {
        let mut c = controller();
        press(&mut c, Point::new(2.0, 2.0));
        let start = FRAME.origin.offset(Point::new(2.0, 2.0));

        for (dx, dy) in [(-40.0, -25.0), (60.0, 30.0), (500.0, 500.0)] {
            let frame = c.drag_to(start.offset(Point::new(dx, dy))).unwrap();
            assert_eq!(frame.bottom_right(), FRAME.bottom_right());
        }

        let frame = c.drag_to(start.offset(Point::new(-40.0, -25.0))).unwrap();
        assert_eq!(frame.origin, Point::new(60.0, 75.0));
    }

    #[test]
    fn test_left_edge_keeps_right_edge() {
        let mut c = controller();
        press(&mut c, Point::new(3.0, 100.0));
        let start = FRAME.origin.offset(Point::new(3.0, 100.0));
        let frame = c.drag_to(start.offset(Point::new(30.0, 77.0))).unwrap();
        assert_eq!(frame.right(), FRAME.right());
        assert_eq!(frame.width(), 270.0);
        assert_eq!(frame.height(), FRAME.height());
        assert_eq!(frame.top(), FRAME.top());
    }

    #[test]
    fn test_resize_respects_min_size() {
        let mut c = controller();
        press(&mut c, Point::new(298.0, 198.0));
        let start = FRAME.origin.offset(Point::new(298.0, 198.0));
        let frame = c.drag_to(start.offset(Point::new(-1000.0, -1000.0))).unwrap();
        assert_eq!(frame.size, Size::new(100.0, 50.0));
    }

    #[test]
    fn test_release_always_clears() {
        let mut c = controller();
        assert_eq!(c.release(), Gesture::Idle);

        press(&mut c, Point::new(150.0, 100.0));
        assert!(c.is_active());
        assert!(matches!(c.release(), Gesture::Dragging { .. }));
        assert!(!c.is_active());
        assert!(c.drag_to(Point::new(0.0, 0.0)).is_none());

        press(&mut c, Point::new(2.0, 2.0));
        assert!(matches!(c.release(), Gesture::Resizing { .. }));
        assert_eq!(c.gesture(), Gesture::Idle);
    }

    #[test]
    fn test_drag_ignores_frame_after_press() {
        let mut c = controller();
        c.press(Point::new(150.0, 100.0), Point::new(250.0, 200.0), FRAME);

        // The same screen position always yields the same frame, however
        // many times it is reported.
        let first = c.drag_to(Point::new(260.0, 210.0)).unwrap();
        let again = c.drag_to(Point::new(260.0, 210.0)).unwrap();
        assert_eq!(first, again);
        assert_eq!(first.origin, Point::new(110.0, 110.0));
    }
}
