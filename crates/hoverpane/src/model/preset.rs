//! Primary window placement presets and on-screen validation.

use hoverpane_core::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Minimum number of pixels of a restored window that must stay on screen.
const MIN_VISIBLE: f64 = 50.0;

/// Smallest size a restored window is clamped to.
const MIN_RESTORED_SIZE: f64 = 60.0;

/// Where the primary window sits on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PositionPreset {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
    /// The user dragged the window; its saved position is used as-is.
    Custom,
}

impl PositionPreset {
    /// Compute the frame of a window of `size` placed by this preset.
    ///
    /// Returns `None` for [`PositionPreset::Custom`], whose origin comes from
    /// the saved position.
    pub fn frame_for(self, size: Size, screen: Rect, margin: f64) -> Option<Rect> {
        let left = screen.left() + margin;
        let right = screen.right() - margin - size.width;
        let top = screen.top() + margin;
        let bottom = screen.bottom() - margin - size.height;

        let origin = match self {
            Self::TopLeft => Point::new(left, top),
            Self::TopRight => Point::new(right, top),
            Self::BottomLeft => Point::new(left, bottom),
            Self::BottomRight => Point::new(right, bottom),
            Self::Center => return Some(Rect::from_center(screen.center(), size)),
            Self::Custom => return None,
        };
        Some(Rect::from_origin_size(origin, size))
    }
}

/// Adjust a restored frame so that it is usable on `screen`.
///
/// The size is clamped to the screen's work area and the origin is moved so
/// at least a 50 pixel strip stays visible; the top edge is kept on screen
/// so the window can always be grabbed. A screen with no usable area
/// leaves the frame unchanged.
pub fn fit_to_screen(frame: Rect, screen: Rect) -> Rect {
    let usable = [screen.left(), screen.top(), screen.width(), screen.height()]
        .iter()
        .all(|v| v.is_finite())
        && screen.width() > 0.0
        && screen.height() > 0.0;
    if !usable {
        return frame;
    }

    let width = frame
        .width()
        .max(MIN_RESTORED_SIZE)
        .min(screen.width());
    let height = frame
        .height()
        .max(MIN_RESTORED_SIZE)
        .min(screen.height());

    // Bounds must satisfy min <= max or clamp panics.
    let max_x = (screen.right() - MIN_VISIBLE).max(screen.left());
    let min_x = (screen.left() - width + MIN_VISIBLE).min(max_x);
    let x = finite_or(frame.left(), screen.left()).clamp(min_x, max_x);

    let max_y = (screen.bottom() - MIN_VISIBLE).max(screen.top());
    let y = finite_or(frame.top(), screen.top()).clamp(screen.top(), max_y);

    Rect::new(x, y, width, height)
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Rect = Rect::new(0.0, 0.0, 1440.0, 900.0);

    #[test]
    fn test_corner_presets() {
        let size = Size::new(200.0, 100.0);
        let tl = PositionPreset::TopLeft.frame_for(size, SCREEN, 20.0).unwrap();
        assert_eq!(tl.origin, Point::new(20.0, 20.0));

        let br = PositionPreset::BottomRight.frame_for(size, SCREEN, 20.0).unwrap();
        assert_eq!(br.bottom_right(), Point::new(1420.0, 880.0));

        let center = PositionPreset::Center.frame_for(size, SCREEN, 20.0).unwrap();
        assert_eq!(center.center(), SCREEN.center());

        assert!(PositionPreset::Custom.frame_for(size, SCREEN, 20.0).is_none());
    }

    #[test]
    fn test_fit_pulls_offscreen_window_back() {
        let lost = Rect::new(5000.0, -300.0, 200.0, 100.0);
        let fitted = fit_to_screen(lost, SCREEN);
        assert_eq!(fitted.left(), 1390.0);
        assert_eq!(fitted.top(), 0.0);
        assert_eq!(fitted.size, lost.size);
    }

    #[test]
    fn test_fit_clamps_size() {
        let huge = Rect::new(0.0, 0.0, 4000.0, 10.0);
        let fitted = fit_to_screen(huge, SCREEN);
        assert_eq!(fitted.width(), 1440.0);
        assert_eq!(fitted.height(), MIN_RESTORED_SIZE);
    }

    #[test]
    fn test_fit_leaves_visible_window_alone() {
        let ok = Rect::new(100.0, 100.0, 300.0, 200.0);
        assert_eq!(fit_to_screen(ok, SCREEN), ok);
    }

    #[test]
    fn test_fit_on_empty_screen_keeps_frame() {
        let frame = Rect::new(10.0, 20.0, 300.0, 200.0);
        assert_eq!(fit_to_screen(frame, Rect::new(0.0, 0.0, 0.0, 0.0)), frame);
        assert_eq!(fit_to_screen(frame, Rect::new(0.0, 0.0, f64::NAN, 900.0)), frame);
    }

    #[test]
    fn test_fit_on_screen_smaller_than_visible_strip() {
        let tiny = Rect::new(10.0, 10.0, 80.0, 40.0);
        let fitted = fit_to_screen(Rect::new(500.0, 500.0, 300.0, 200.0), tiny);
        assert_eq!(fitted, Rect::new(40.0, 10.0, 80.0, 40.0));
    }

    #[test]
    fn test_fit_replaces_non_finite_origin() {
        let broken = Rect::new(f64::NAN, f64::INFINITY, 200.0, 100.0);
        let fitted = fit_to_screen(broken, SCREEN);
        assert_eq!(fitted.origin, Point::new(0.0, 0.0));
    }
}
