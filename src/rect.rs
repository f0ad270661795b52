//! Rectangles and insets.

use cgmath::{Point2, Vector2, Zero};
use std::ops;

/// A rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Rectangle origin (top left corner).
    pub origin: Point2<f64>,

    /// Rectangle size.
    pub size: Vector2<f64>,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(origin: Point2<f64>, size: Vector2<f64>) -> Rect {
        Rect { origin, size }
    }

    /// Creates a new rectangle from its components.
    pub fn xywh(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect {
            origin: Point2::new(x, y),
            size: Vector2::new(width, height),
        }
    }

    /// Returns a zero-sized rectangle at the origin.
    pub fn zero() -> Rect {
        Rect {
            origin: Point2::new(0., 0.),
            size: Vector2::zero(),
        }
    }

    pub fn x(&self) -> f64 {
        self.origin.x
    }

    pub fn y(&self) -> f64 {
        self.origin.y
    }

    pub fn width(&self) -> f64 {
        self.size.x
    }

    pub fn height(&self) -> f64 {
        self.size.y
    }

    /// The right edge.
    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.x
    }

    /// The bottom edge.
    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.y
    }

    /// Returns true if the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0. || self.size.y <= 0.
    }

    /// Returns the center point.
    pub fn center(&self) -> Point2<f64> {
        self.origin + self.size / 2.
    }

    /// Returns true if the point is inside the rectangle.
    ///
    /// The left and top edges are inside, the right and bottom edges are not.
    pub fn contains(&self, point: Point2<f64>) -> bool {
        point.x >= self.origin.x
            && point.y >= self.origin.y
            && point.x < self.origin.x + self.size.x
            && point.y < self.origin.y + self.size.y
    }

    /// Returns true if the two rectangles intersect.
    pub fn intersects(&self, rect: Rect) -> bool {
        let own_opposite = self.origin + self.size;
        let rect_opposite = rect.origin + rect.size;

        self.origin.x < rect_opposite.x
            && self.origin.y < rect_opposite.y
            && rect.origin.x < own_opposite.x
            && rect.origin.y < own_opposite.y
    }

    /// Returns the intersection rectangle.
    pub fn intersect(&self, rect: Rect) -> Option<Rect> {
        if !self.intersects(rect) {
            return None;
        }

        let min_x = self.origin.x.max(rect.origin.x);
        let min_y = self.origin.y.max(rect.origin.y);
        let max_x = self.max_x().min(rect.max_x());
        let max_y = self.max_y().min(rect.max_y());

        Some(Rect::xywh(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Returns a new rectangle inset by the specified amount on each side.
    pub fn inset(&self, horiz: f64, vert: f64) -> Rect {
        Rect::xywh(
            self.origin.x + horiz,
            self.origin.y + vert,
            self.size.x - 2. * horiz,
            self.size.y - 2. * vert,
        )
    }

    /// Returns a new rectangle shrunk by the given insets.
    ///
    /// The resulting size never goes below zero.
    pub fn inset_by(&self, insets: Insets) -> Rect {
        Rect::xywh(
            self.origin.x + insets.left,
            self.origin.y + insets.top,
            (self.size.x - insets.horizontal()).max(0.),
            (self.size.y - insets.vertical()).max(0.),
        )
    }

    /// Returns a new rectangle with the given origin.
    pub fn with_origin(&self, origin: Point2<f64>) -> Rect {
        Rect {
            origin,
            size: self.size,
        }
    }

    /// Returns a new rectangle with the given size.
    pub fn with_size(&self, size: Vector2<f64>) -> Rect {
        Rect {
            origin: self.origin,
            size,
        }
    }
}

impl ops::Add<Vector2<f64>> for Rect {
    type Output = Rect;
    fn add(self, offset: Vector2<f64>) -> Rect {
        Rect {
            origin: self.origin + offset,
            size: self.size,
        }
    }
}

impl ops::Sub<Vector2<f64>> for Rect {
    type Output = Rect;
    fn sub(self, offset: Vector2<f64>) -> Rect {
        Rect {
            origin: self.origin - offset,
            size: self.size,
        }
    }
}

/// Per-edge insets, e.g. padding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Insets {
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Insets {
        Insets {
            left,
            right,
            top,
            bottom,
        }
    }

    /// The same inset on every edge.
    pub fn uniform(inset: f64) -> Insets {
        Insets::new(inset, inset, inset, inset)
    }

    /// Sum of left and right.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::xywh(100., 100., 200., 150.);
        assert!(rect.contains(Point2::new(100., 100.)));
        assert!(rect.contains(Point2::new(299., 249.)));
        assert!(!rect.contains(Point2::new(300., 125.)));
        assert!(!rect.contains(Point2::new(150., 250.)));
        assert!(!rect.contains(Point2::new(99., 100.)));
    }

    #[test]
    fn intersection() {
        let a = Rect::xywh(0., 0., 100., 100.);
        let b = Rect::xywh(50., 25., 100., 100.);
        assert_eq!(a.intersect(b), Some(Rect::xywh(50., 25., 50., 75.)));
        assert_eq!(a.intersect(Rect::xywh(100., 0., 10., 10.)), None);
    }

    #[test]
    fn inset_by_never_goes_negative() {
        let rect = Rect::xywh(0., 0., 20., 20.);
        let inset = rect.inset_by(Insets::new(5., 5., 15., 15.));
        assert_eq!(inset, Rect::xywh(5., 15., 10., 0.));
    }
}
