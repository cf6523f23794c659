use serde::{Deserialize, Serialize};

use crate::{BoundingBox, Point, Segment};

/// A closed polygonal region: the boundary of a floorplan space.
///
/// Vertices are stored in order without repeating the first point at the
/// end; the closing edge from the last vertex back to the first is implicit.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Polygon { vertices }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// A valid space boundary has at least 3 vertices and isn't degenerate
    /// (all vertices collinear, i.e. zero enclosed area).
    pub fn is_valid(&self) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }
        self.area().abs() > f64::EPSILON
    }

    /// The boundary edges, each from one vertex to the next, wrapping around
    /// from the last vertex back to the first.
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Segment::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.vertices.iter().copied())
    }

    /// Shoelace formula; signed, positive for counter-clockwise winding.
    pub fn area(&self) -> f64 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            sum += a.x() * b.y() - b.x() * a.y();
        }
        sum / 2.0
    }

    pub fn centroid(&self) -> Point {
        let n = self.vertices.len() as f64;
        let (sx, sy) = self
            .vertices
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x(), sy + p.y()));
        Point::new(sx / n, sy / n)
    }

    /// Point-in-polygon via ray casting (even-odd rule), casting the test
    /// ray along +x.
    pub fn contains_point(&self, p: Point) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];

            let crosses = (vi.y() > p.y()) != (vj.y() > p.y());
            if crosses {
                let x_at_y = vi.x() + (p.y() - vi.y()) / (vj.y() - vi.y()) * (vj.x() - vi.x());
                if p.x() < x_at_y {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ])
    }

    #[test]
    fn point_inside_square() {
        assert!(square().contains_point(Point::new(5.0, 5.0)));
    }

    #[test]
    fn point_outside_square() {
        assert!(!square().contains_point(Point::new(20.0, 5.0)));
    }

    #[test]
    fn degenerate_polygon_is_invalid() {
        let line = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
        ]);
        assert!(!line.is_valid());
    }

    #[test]
    fn square_has_four_edges() {
        assert_eq!(square().edges().count(), 4);
    }
}
