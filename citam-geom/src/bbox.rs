use serde::{Deserialize, Serialize};

use crate::Point;

/// An axis-aligned bounding box in drawing coordinates.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn new(min: Point, max: Point) -> Self {
        BoundingBox { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bbox = BoundingBox::new(first, first);
        for p in points {
            bbox.extend(p);
        }
        Some(bbox)
    }

    pub fn extend(&mut self, p: Point) {
        self.min = Point::new(self.min.x().min(p.x()), self.min.y().min(p.y()));
        self.max = Point::new(self.max.x().max(p.x()), self.max.y().max(p.y()));
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut b = *self;
        b.extend(other.min);
        b.extend(other.max);
        b
    }

    pub fn width(&self) -> f64 {
        self.max.x() - self.min.x()
    }

    pub fn height(&self) -> f64 {
        self.max.y() - self.min.y()
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x() >= self.min.x() && p.x() <= self.max.x() && p.y() >= self.min.y() && p.y() <= self.max.y()
    }

    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.min.x() <= other.max.x()
            && self.max.x() >= other.min.x()
            && self.min.y() <= other.max.y()
            && self.max.y() >= other.min.y()
    }

    pub fn center(&self) -> Point {
        self.min.midpoint(&self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_covers_both_boxes() {
        let a = BoundingBox::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let b = BoundingBox::new(Point::new(2.0, 2.0), Point::new(3.0, 3.0));
        let u = a.union(&b);
        assert_eq!(u.min, Point::new(0.0, 0.0));
        assert_eq!(u.max, Point::new(3.0, 3.0));
    }
}
