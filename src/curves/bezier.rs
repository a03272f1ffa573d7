//! Cubic Bézier evaluation and discretization.
//!
//! The free functions [`cubic_point`] and [`cubic_derivative`] are the
//! stateless core used by the spline for every query. [`CubicBezier3`]
//! packages the same four control points as a value with splitting and
//! adaptive flattening on top.

use crate::primitives::{Point3, Segment3, Vec3};
use num_traits::Float;

/// Subdivision depth cap for adaptive flattening.
const MAX_SUBDIVISION_DEPTH: u32 = 16;

/// Evaluates the cubic Bézier polynomial at `t`.
///
/// `p0` is the segment start, `p1` the start's outgoing handle, `p2` the
/// end's incoming handle and `p3` the segment end. `t` is expected in
/// [0, 1] and is not clamped.
///
/// # Example
///
/// ```
/// use curvum::Point3;
/// use curvum::curves::cubic_point;
///
/// let mid = cubic_point(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(2.0, 0.0, 0.0),
///     Point3::new(3.0, 0.0, 0.0),
///     0.5,
/// );
/// assert_eq!(mid, Point3::new(1.5, 0.0, 0.0));
/// ```
#[inline]
pub fn cubic_point<F: Float>(
    p0: Point3<F>,
    p1: Point3<F>,
    p2: Point3<F>,
    p3: Point3<F>,
    t: F,
) -> Point3<F> {
    let one = F::one();
    let three = one + one + one;
    let mt = one - t;
    let mt2 = mt * mt;
    let t2 = t * t;

    let b0 = mt2 * mt;
    let b1 = three * mt2 * t;
    let b2 = three * mt * t2;
    let b3 = t2 * t;

    Point3::new(
        b0 * p0.x + b1 * p1.x + b2 * p2.x + b3 * p3.x,
        b0 * p0.y + b1 * p1.y + b2 * p2.y + b3 * p3.y,
        b0 * p0.z + b1 * p1.z + b2 * p2.z + b3 * p3.z,
    )
}

/// Evaluates the first derivative of the cubic Bézier at `t`.
///
/// The result is the velocity of the curve with respect to `t`; it is not
/// normalized.
#[inline]
pub fn cubic_derivative<F: Float>(
    p0: Point3<F>,
    p1: Point3<F>,
    p2: Point3<F>,
    p3: Point3<F>,
    t: F,
) -> Vec3<F> {
    let one = F::one();
    let three = one + one + one;
    let six = three + three;
    let mt = one - t;

    // B'(t) = 3(1-t)²(p1-p0) + 6(1-t)t(p2-p1) + 3t²(p3-p2)
    (p1 - p0) * (three * mt * mt) + (p2 - p1) * (six * mt * t) + (p3 - p2) * (three * t * t)
}

/// A single cubic Bézier segment in 3D.
///
/// The curve starts at `p0`, is pulled toward `p1` and `p2`, and ends at `p3`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier3<F> {
    /// Start point
    pub p0: Point3<F>,
    /// Start handle
    pub p1: Point3<F>,
    /// End handle
    pub p2: Point3<F>,
    /// End point
    pub p3: Point3<F>,
}

impl<F: Float> CubicBezier3<F> {
    /// Creates a new cubic Bézier segment.
    #[inline]
    pub fn new(p0: Point3<F>, p1: Point3<F>, p2: Point3<F>, p3: Point3<F>) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluates the curve at parameter `t` (0 to 1).
    #[inline]
    pub fn eval(&self, t: F) -> Point3<F> {
        cubic_point(self.p0, self.p1, self.p2, self.p3, t)
    }

    /// Returns the derivative at parameter `t`.
    #[inline]
    pub fn derivative_at(&self, t: F) -> Vec3<F> {
        cubic_derivative(self.p0, self.p1, self.p2, self.p3, t)
    }

    /// Splits the curve at parameter `t`, returning the two halves.
    pub fn split(&self, t: F) -> (Self, Self) {
        // de Casteljau
        let p01 = self.p0.lerp(self.p1, t);
        let p12 = self.p1.lerp(self.p2, t);
        let p23 = self.p2.lerp(self.p3, t);

        let p012 = p01.lerp(p12, t);
        let p123 = p12.lerp(p23, t);

        let p0123 = p012.lerp(p123, t);

        (
            Self::new(self.p0, p01, p012, p0123),
            Self::new(p0123, p123, p23, self.p3),
        )
    }

    /// Returns the larger distance of the two handles from the chord `p0`-`p3`.
    #[inline]
    pub fn flatness(&self) -> F {
        let chord = Segment3::new(self.p0, self.p3);
        chord
            .distance_to_point(self.p1)
            .max(chord.distance_to_point(self.p2))
    }

    /// Converts the curve to a polyline using adaptive subdivision.
    ///
    /// The result always starts with `p0` and ends with `p3`.
    ///
    /// # Example
    ///
    /// ```
    /// use curvum::Point3;
    /// use curvum::curves::CubicBezier3;
    ///
    /// let curve = CubicBezier3::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 2.0, 0.0),
    ///     Point3::new(3.0, 2.0, 1.0),
    ///     Point3::new(4.0, 0.0, 1.0),
    /// );
    ///
    /// let polyline = curve.to_polyline(0.05);
    /// assert!(polyline.len() > 2);
    /// assert_eq!(polyline[0], curve.p0);
    /// assert_eq!(*polyline.last().unwrap(), curve.p3);
    /// ```
    pub fn to_polyline(&self, tolerance: F) -> Vec<Point3<F>> {
        let mut points = vec![self.p0];
        self.flatten_into(tolerance, &mut points);
        points
    }

    /// Appends the flattened curve to `points`, excluding `p0`.
    pub(crate) fn flatten_into(&self, tolerance: F, points: &mut Vec<Point3<F>>) {
        self.subdivide_recursive(tolerance, 0, points);
    }

    fn subdivide_recursive(&self, tolerance: F, depth: u32, points: &mut Vec<Point3<F>>) {
        if depth >= MAX_SUBDIVISION_DEPTH || self.flatness() <= tolerance {
            points.push(self.p3);
        } else {
            let half = F::one() / (F::one() + F::one());
            let (left, right) = self.split(half);
            left.subdivide_recursive(tolerance, depth + 1, points);
            right.subdivide_recursive(tolerance, depth + 1, points);
        }
    }

    /// Appends `(t, point)` samples of the curve to `samples`, excluding `t = 0`.
    ///
    /// Unlike [`to_polyline`](Self::to_polyline), a piece is only accepted
    /// once its parameter advances evenly along its chord: the quarter points
    /// of the piece must lie within `tolerance` of the matching chord points.
    /// Interpolating `t` linearly by distance between samples is then accurate
    /// to about `tolerance`.
    pub(crate) fn sample_uniform_into(&self, tolerance: F, samples: &mut Vec<(F, Point3<F>)>) {
        self.sample_recursive(tolerance, F::zero(), F::one(), 0, samples);
    }

    fn sample_recursive(
        &self,
        tolerance: F,
        t0: F,
        t1: F,
        depth: u32,
        samples: &mut Vec<(F, Point3<F>)>,
    ) {
        let half = F::one() / (F::one() + F::one());
        let quarter = half * half;
        let drift = |t: F| self.eval(t).distance(self.p0.lerp(self.p3, t));

        // A cubic drift that vanishes at 0, 1/4, 3/4 and 1 is zero everywhere.
        let even = drift(quarter) <= tolerance && drift(F::one() - quarter) <= tolerance;
        if depth >= MAX_SUBDIVISION_DEPTH || (even && self.flatness() <= tolerance) {
            samples.push((t1, self.p3));
        } else {
            let mid = t0 + (t1 - t0) * half;
            let (left, right) = self.split(half);
            left.sample_recursive(tolerance, t0, mid, depth + 1, samples);
            right.sample_recursive(tolerance, mid, t1, depth + 1, samples);
        }
    }

    /// Returns the approximate arc length of the curve.
    pub fn arc_length(&self, tolerance: F) -> F {
        polyline_length(&self.to_polyline(tolerance))
    }

    /// Returns the bounding box of the four control points.
    ///
    /// The curve lies inside its control hull, so this is a conservative bound.
    pub fn control_bounds(&self) -> (Point3<F>, Point3<F>) {
        let min = self.p0.min(self.p1).min(self.p2).min(self.p3);
        let max = self.p0.max(self.p1).max(self.p2).max(self.p3);
        (min, max)
    }
}

/// Sums the lengths of consecutive polyline edges.
pub(crate) fn polyline_length<F: Float>(points: &[Point3<F>]) -> F {
    points
        .windows(2)
        .fold(F::zero(), |acc, w| acc + w[0].distance(w[1]))
}
