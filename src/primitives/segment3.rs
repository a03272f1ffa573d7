//! 3D line segment, used as the chord of a curve segment.

use super::{Point3, Vec3};
use num_traits::Float;

/// A 3D line segment defined by two endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment3<F> {
    pub start: Point3<F>,
    pub end: Point3<F>,
}

impl<F: Float> Segment3<F> {
    /// Creates a new segment from two points.
    #[inline]
    pub fn new(start: Point3<F>, end: Point3<F>) -> Self {
        Self { start, end }
    }

    /// Returns the direction vector from start to end.
    #[inline]
    pub fn direction(self) -> Vec3<F> {
        self.end - self.start
    }

    #[inline]
    pub fn length(self) -> F {
        self.start.distance(self.end)
    }

    /// Returns the point at parameter `t`; values outside [0, 1] extrapolate.
    #[inline]
    pub fn point_at(self, t: F) -> Point3<F> {
        self.start.lerp(self.end, t)
    }

    /// Computes the closest point on the segment to `p`.
    ///
    /// Returns `(closest_point, t)` with `t` in [0, 1].
    pub fn closest_point(self, p: Point3<F>) -> (Point3<F>, F) {
        let v = self.direction();
        let len_sq = v.magnitude_squared();

        // Degenerate chord: both ends coincide.
        if len_sq <= F::epsilon() {
            return (self.start, F::zero());
        }

        let t = (p - self.start).dot(v) / len_sq;
        let t = t.max(F::zero()).min(F::one());
        (self.point_at(t), t)
    }

    /// Computes the distance from a point to this segment.
    #[inline]
    pub fn distance_to_point(self, p: Point3<F>) -> F {
        let (closest, _) = self.closest_point(p);
        p.distance(closest)
    }
}
