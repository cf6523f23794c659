use std::ops::{Add, Mul, Sub};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// A point in floorplan drawing coordinates.
///
/// Backed by [`OrderedFloat`] so points can be used as graph node keys and
/// as keys in the per-coordinate contact-location tally without the usual
/// float-as-hash-key caveats biting us.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
)]
pub struct Point {
    x: OrderedFloat<f64>,
    y: OrderedFloat<f64>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point {
            x: OrderedFloat(x),
            y: OrderedFloat(y),
        }
    }

    pub fn x(&self) -> f64 {
        self.x.0
    }

    pub fn y(&self) -> f64 {
        self.y.0
    }

    pub fn dist(&self, other: &Point) -> f64 {
        (self.x() - other.x()).hypot(self.y() - other.y())
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x() + other.x()) / 2.0, (self.y() + other.y()) / 2.0)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x() + dx, self.y() + dy)
    }

    /// Rotate around `origin` by `radians`, counter-clockwise.
    pub fn rotate(&self, origin: Point, radians: f64) -> Point {
        let (sin, cos) = radians.sin_cos();
        let dx = self.x() - origin.x();
        let dy = self.y() - origin.y();
        Point::new(
            origin.x() + dx * cos - dy * sin,
            origin.y() + dx * sin + dy * cos,
        )
    }

    /// Squared distance; cheaper than [`Point::dist`] when only comparing
    /// magnitudes.
    pub fn dist2(&self, other: &Point) -> f64 {
        let dx = self.x() - other.x();
        let dy = self.y() - other.y();
        dx * dx + dy * dy
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x() + rhs.x(), self.y() + rhs.y())
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x() - rhs.x(), self.y() - rhs.y())
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x() * rhs, self.y() * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_is_symmetric() {
        let a = Point::new(5.0, 5.0);
        let b = Point::new(6.0, 5.0);
        assert_eq!(a.midpoint(&b), Point::new(5.5, 5.0));
        assert_eq!(a.midpoint(&b), b.midpoint(&a));
    }

    #[test]
    fn points_are_hashable() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Point::new(1.0, 1.0));
        set.insert(Point::new(1.0, 1.0));
        assert_eq!(set.len(), 1);
    }
}
