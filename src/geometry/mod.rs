//! Geometric primitives for region detection.
//!
//! Coordinates are integer pixel positions with the origin at the top-left
//! corner of the image and `y` growing downwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in pixel space.
///
/// `(x1, y1)` is the top-left corner and `(x2, y2)` is one past the
/// bottom-right pixel, so `width = x2 - x1`. The invariant `x2 >= x1`,
/// `y2 >= y1` is upheld by every constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    /// Left edge
    pub x1: i32,
    /// Top edge
    pub y1: i32,
    /// Right edge (exclusive)
    pub x2: i32,
    /// Bottom edge (exclusive)
    pub y2: i32,
}

impl Rectangle {
    /// Create a rectangle from two corners, in any order.
    ///
    /// # Examples
    ///
    /// ```
    /// use docscan::geometry::Rectangle;
    ///
    /// let rect = Rectangle::new(110, 70, 10, 20);
    /// assert_eq!((rect.x1, rect.y1, rect.x2, rect.y2), (10, 20, 110, 70));
    /// assert_eq!(rect.width(), 100);
    /// assert_eq!(rect.height(), 50);
    /// ```
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Create a rectangle from its top-left corner and size.
    pub fn from_xywh(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self::new(x, y, x + width as i32, y + height as i32)
    }

    /// Smallest rectangle covering every point, or `None` for no points.
    ///
    /// Each point is treated as a whole pixel, so a single point yields a
    /// 1×1 rectangle.
    pub fn bounding<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let mut iter = points.into_iter();
        let (x, y) = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (x, y, x, y);
        for (x, y) in iter {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        Some(Self::new(min_x, min_y, max_x + 1, max_y + 1))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        (self.x2 - self.x1) as u32
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        (self.y2 - self.y1) as u32
    }

    /// Area in pixels.
    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// True if `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Rectangle) -> bool {
        other.x1 >= self.x1 && other.y1 >= self.y1 && other.x2 <= self.x2 && other.y2 <= self.y2
    }

    /// Check whether two rectangles agree on every edge within `tolerance` pixels.
    pub fn approx_eq(&self, other: &Rectangle, tolerance: i32) -> bool {
        (self.x1 - other.x1).abs() <= tolerance
            && (self.y1 - other.y1).abs() <= tolerance
            && (self.x2 - other.x2).abs() <= tolerance
            && (self.y2 - other.y2).abs() <= tolerance
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x1, self.y1, self.x2, self.y2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_normalizes_corners() {
        let rect = Rectangle::new(50, 40, 10, 0);
        assert_eq!(rect, Rectangle::new(10, 0, 50, 40));
        assert_eq!(rect.width(), 40);
        assert_eq!(rect.height(), 40);
        assert_eq!(rect.area(), 1600);
    }

    #[test]
    fn test_from_xywh() {
        let rect = Rectangle::from_xywh(5, 6, 300, 40);
        assert_eq!((rect.x1, rect.y1, rect.x2, rect.y2), (5, 6, 305, 46));
    }

    #[test]
    fn test_bounding_points() {
        let rect = Rectangle::bounding(vec![(3, 9), (10, 2), (7, 7)]).unwrap();
        assert_eq!(rect, Rectangle::new(3, 2, 11, 10));

        let single = Rectangle::bounding(vec![(4, 4)]).unwrap();
        assert_eq!(single.width(), 1);
        assert_eq!(single.height(), 1);

        assert!(Rectangle::bounding(Vec::<(i32, i32)>::new()).is_none());
    }

    #[test]
    fn test_contains_and_approx() {
        let outer = Rectangle::new(0, 0, 100, 100);
        let inner = Rectangle::new(10, 10, 20, 20);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));

        assert!(inner.approx_eq(&Rectangle::new(11, 9, 21, 20), 1));
        assert!(!inner.approx_eq(&Rectangle::new(13, 10, 20, 20), 1));
    }

    #[test]
    fn test_display() {
        assert_eq!(Rectangle::new(1, 2, 3, 4).to_string(), "(1, 2, 3, 4)");
    }
}
