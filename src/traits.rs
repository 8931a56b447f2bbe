//! Core traits for the depot router.
//!
//! These are intentionally minimal. The planner is generic over them so
//! callers can swap the distance function without touching the heuristics.

use crate::model::Point;

/// Anything that sits at a fixed point on the plane.
pub trait Located {
    fn location(&self) -> Point;
}

/// Distance between two points on the plane.
///
/// Every "nearest" selection in the planner goes through this trait, so a
/// metric must be symmetric and non-negative for the heuristics to behave.
pub trait DistanceMetric: Sync {
    fn distance(&self, from: Point, to: Point) -> f64;

    /// Distance between two located things.
    fn between<A: Located, B: Located>(&self, from: &A, to: &B) -> f64
    where
        Self: Sized,
    {
        self.distance(from.location(), to.location())
    }
}

impl<M: DistanceMetric + ?Sized> DistanceMetric for &M {
    fn distance(&self, from: Point, to: Point) -> f64 {
        (**self).distance(from, to)
    }
}
