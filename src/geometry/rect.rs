use super::Size;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A crop rectangle. Covers `left <= x < right` and `top <= y < bottom`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub top_left: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            top_left: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// The full area of `size` anchored at the origin.
    pub const fn at_origin(size: Size) -> Self {
        Self {
            top_left: Point::new(0, 0),
            size,
        }
    }

    pub fn left(&self) -> i32 {
        self.top_left.x
    }

    pub fn top(&self) -> i32 {
        self.top_left.y
    }

    pub fn right(&self) -> i32 {
        self.top_left.x + self.size.width
    }

    pub fn bottom(&self) -> i32 {
        self.top_left.y + self.size.height
    }

    pub fn width(&self) -> i32 {
        self.size.width
    }

    pub fn height(&self) -> i32 {
        self.size.height
    }

    pub fn area(&self) -> i64 {
        self.size.area()
    }

    pub fn with_size(self, size: Size) -> Self {
        Self { size, ..self }
    }

    pub fn contains_point(&self, point: Point) -> bool {
        self.left() <= point.x
            && point.x < self.right()
            && self.top() <= point.y
            && point.y < self.bottom()
    }

    /// True if every pixel of `self` lies inside `outer`.
    pub fn within_rect(&self, outer: &Rect) -> bool {
        self.left() >= outer.left()
            && self.top() >= outer.top()
            && self.right() <= outer.right()
            && self.bottom() <= outer.bottom()
    }

    /// Overlapping area, `None` when the rectangles are disjoint.
    ///
    /// Rectangles that only share an edge intersect in an empty rect.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        if other.left() > self.right()
            || other.right() < self.left()
            || other.top() > self.bottom()
            || other.bottom() < self.top()
        {
            return None;
        }
        let left = self.left().max(other.left());
        let right = self.right().min(other.right());
        let top = self.top().max(other.top());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}+{}", self.size, self.left(), self.top())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_edges() {
        let r = Rect::new(10, 20, 300, 200);
        assert_eq!((r.left(), r.top(), r.right(), r.bottom()), (10, 20, 310, 220));
        assert_eq!((r.width(), r.height()), (300, 200));
        assert_eq!(r.area(), 60_000);
    }

    #[test]
    fn contains_point_is_half_open() {
        let r = Rect::new(0, 0, 100, 50);
        assert!(r.contains_point(Point::new(0, 0)));
        assert!(r.contains_point(Point::new(99, 49)));
        assert!(!r.contains_point(Point::new(100, 10)));
        assert!(!r.contains_point(Point::new(10, 50)));
        assert!(!r.contains_point(Point::new(-1, 10)));
    }

    #[test]
    fn within_rect_allows_touching_edges() {
        let image = Rect::at_origin(Size::new(1600, 1200));
        assert!(Rect::new(0, 80, 800, 600).within_rect(&image));
        assert!(Rect::new(800, 600, 800, 600).within_rect(&image));
        assert!(image.within_rect(&image));
        assert!(!Rect::new(0, -20, 800, 600).within_rect(&image));
        assert!(!Rect::new(801, 0, 800, 600).within_rect(&image));
        assert!(!Rect::new(0, 601, 800, 600).within_rect(&image));
    }

    #[test]
    fn intersect_overlapping() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 25, 100, 100);
        assert_eq!(a.intersect(&b), Some(Rect::new(50, 25, 50, 75)));
        assert_eq!(b.intersect(&a), a.intersect(&b));
    }

    #[test]
    fn intersect_disjoint_is_none() {
        let a = Rect::new(0, 0, 100, 100);
        assert_eq!(a.intersect(&Rect::new(101, 0, 10, 10)), None);
        assert_eq!(a.intersect(&Rect::new(0, 200, 10, 10)), None);
    }

    #[test]
    fn display_matches_extract_geometry() {
        assert_eq!(Rect::new(0, 80, 800, 600).to_string(), "800x600+0+80");
    }
}
