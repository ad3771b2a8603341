//! Geometry primitives shared by the table and image engines
//!
//! All coordinates are client pixels as delivered by the host (y grows down).

use serde::{Deserialize, Serialize};

/// A point in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `other` to `self`
    pub fn delta_from(&self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    /// Rotate this point about `center` by `degrees`
    ///
    /// `x' = cx + (x-cx)cosθ - (y-cy)sinθ`, `y' = cy + (x-cx)sinθ + (y-cy)cosθ`
    pub fn rotate_about(&self, center: Point, degrees: f64) -> Point {
        let offset = rotate_vector(self.delta_from(center), degrees);
        Point::new(center.x + offset.x, center.y + offset.y)
    }
}

/// Rotate a free vector by `degrees`
pub fn rotate_vector(v: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Point::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle (left/top origin, like `getBoundingClientRect`)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Square box of side `size` centered on `center`
    pub fn centered(center: Point, size: f64) -> Self {
        let half = size / 2.0;
        Self::new(center.x - half, center.y - half, size, size)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment test
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Smallest rectangle enclosing both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Smallest rectangle enclosing every rect, or `None` for an empty input
    pub fn union_all<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Rect> {
        rects.into_iter().fold(None, |acc: Option<Rect>, r| match acc {
            Some(u) => Some(u.union(r)),
            None => Some(*r),
        })
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let p = Point::new(10.0, 0.0).rotate_about(Point::new(0.0, 0.0), 90.0);
        assert!(approx(p.x, 0.0));
        assert!(approx(p.y, 10.0));
    }

    #[test]
    fn test_union_all() {
        let rects = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(20.0, 5.0, 10.0, 20.0),
        ];
        let u = Rect::union_all(rects.iter()).unwrap();
        assert_eq!(u, Rect::new(0.0, 0.0, 30.0, 25.0));
        assert!(Rect::union_all(std::iter::empty()).is_none());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(!r.contains(Point::new(10.1, 5.0)));
    }
}
