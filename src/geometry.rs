//! Plane geometry helpers.
//!
//! Straight-line distance is the reference metric for clustering and
//! route construction.

use crate::model::Point;
use crate::traits::DistanceMetric;

/// Euclidean distance metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl DistanceMetric for Euclidean {
    fn distance(&self, from: Point, to: Point) -> f64 {
        euclidean(from, to)
    }
}

/// Straight-line distance between two points.
pub fn euclidean(from: Point, to: Point) -> f64 {
    (from.x - to.x).hypot(from.y - to.y)
}

/// Unweighted centroid of a set of points, or `None` when the set is empty.
pub fn centroid<I>(points: I) -> Option<Point>
where
    I: IntoIterator<Item = Point>,
{
    let (mut sum_x, mut sum_y, mut count) = (0.0, 0.0, 0usize);
    for point in points {
        sum_x += point.x;
        sum_y += point.y;
        count += 1;
    }

    if count == 0 {
        return None;
    }

    let n = count as f64;
    Some(Point::new(sum_x / n, sum_y / n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_same_point() {
        let p = Point::new(3.5, -2.0);
        assert_eq!(euclidean(p, p), 0.0);
    }

    #[test]
    fn test_euclidean_known_distance() {
        // 3-4-5 triangle
        let dist = euclidean(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert!((dist - 5.0).abs() < 1e-12, "expected 5, got {}", dist);
    }

    #[test]
    fn test_euclidean_symmetric() {
        let a = Point::new(1.0, 7.0);
        let b = Point::new(-4.0, 2.5);
        assert_eq!(Euclidean.distance(a, b), Euclidean.distance(b, a));
    }

    #[test]
    fn test_centroid_of_points() {
        let c = centroid([Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(2.0, 6.0)]).unwrap();
        assert!((c.x - 2.0).abs() < 1e-12);
        assert!((c.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_centroid_empty() {
        assert!(centroid(std::iter::empty()).is_none());
    }
}
