//! Geometry primitives in logical screen pixels.
//!
//! Coordinates use a single screen space with the origin at the top-left of
//! the primary screen and y growing downward. A frame's top edge is
//! `origin.y`; its bottom edge is `origin.y + size.height`.

use serde::{Deserialize, Serialize};

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Offset this point by another point treated as a vector.
    #[inline]
    pub fn offset(self, by: Point) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }

    /// The vector from `other` to `self`.
    #[inline]
    pub fn delta_from(self, other: Point) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// A size in 2D space (width and height).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Check if the size has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Clamp each dimension into `[min, max]`.
    ///
    /// When `min` exceeds `max` on an axis the minimum wins.
    pub fn clamp(self, min: Size, max: Size) -> Self {
        Self {
            width: self.width.min(max.width).max(min.width),
            height: self.height.min(max.height).max(min.height),
        }
    }
}

/// A rectangle defined by origin (top-left) and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// Create a new rectangle from origin and size.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    /// Create a rectangle from an origin and size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Create a rectangle centered at a point.
    #[inline]
    pub fn from_center(center: Point, size: Size) -> Self {
        Self {
            origin: Point {
                x: center.x - size.width / 2.0,
                y: center.y - size.height / 2.0,
            },
            size,
        }
    }

    /// Left edge x coordinate.
    #[inline]
    pub fn left(&self) -> f64 {
        self.origin.x
    }

    /// Top edge y coordinate.
    #[inline]
    pub fn top(&self) -> f64 {
        self.origin.y
    }

    /// Right edge x coordinate.
    #[inline]
    pub fn right(&self) -> f64 {
        self.origin.x + self.size.width
    }

    /// Bottom edge y coordinate.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.height
    }

    /// Width of the rectangle.
    #[inline]
    pub fn width(&self) -> f64 {
        self.size.width
    }

    /// Height of the rectangle.
    #[inline]
    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Center point of the rectangle.
    #[inline]
    pub fn center(&self) -> Point {
        Point {
            x: self.origin.x + self.size.width / 2.0,
            y: self.origin.y + self.size.height / 2.0,
        }
    }

    /// Bottom-right corner.
    #[inline]
    pub fn bottom_right(&self) -> Point {
        Point {
            x: self.right(),
            y: self.bottom(),
        }
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Compute the intersection of two rectangles.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left < right && top < bottom {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    /// Return this rectangle moved to a new origin.
    #[inline]
    pub fn with_origin(self, origin: Point) -> Self {
        Self { origin, ..self }
    }

    /// Return this rectangle with a new size, keeping the origin.
    #[inline]
    pub fn with_size(self, size: Size) -> Self {
        Self { size, ..self }
    }

    /// Return this rectangle with a new height, keeping the top edge fixed.
    #[inline]
    pub fn with_height_top_anchored(self, height: f64) -> Self {
        Self {
            size: Size::new(self.size.width, height),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.bottom(), 70.0);
        assert_eq!(r.center(), Point::new(60.0, 45.0));
        assert_eq!(r.bottom_right(), Point::new(110.0, 70.0));
    }

    #[test]
    fn test_rect_contains_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(9.9, 9.9)));
        assert!(!r.contains(Point::new(10.0, 5.0)));
    }

    #[test]
    fn test_intersect() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 50.0, 100.0, 100.0);
        assert_eq!(a.intersect(&b), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));

        let c = Rect::new(100.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersect(&c), None);
    }

    #[test]
    fn test_size_clamp() {
        let min = Size::new(100.0, 50.0);
        let max = Size::new(400.0, 300.0);
        assert_eq!(Size::new(10.0, 500.0).clamp(min, max), Size::new(100.0, 300.0));
        assert_eq!(Size::new(200.0, 100.0).clamp(min, max), Size::new(200.0, 100.0));
    }

    #[test]
    fn test_top_anchored_height() {
        let r = Rect::new(0.0, 500.0, 200.0, 100.0).with_height_top_anchored(300.0);
        assert_eq!(r.top(), 500.0);
        assert_eq!(r.bottom(), 800.0);
    }

    #[test]
    fn test_serde_shape() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&r).unwrap();
        let back: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
