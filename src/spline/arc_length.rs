//! Distance-to-parameter lookup for constant-speed motion.

use super::{cast, BezierSpline};
use num_traits::Float;

/// Cumulative arc length of a spline, sampled against its normalized
/// parameter `u`.
///
/// The Bézier parameter does not advance at a constant rate along the
/// curve, so moving a fixed distance means inverting this table rather
/// than stepping `u` directly.
///
/// # Example
///
/// ```
/// use curvum::{BezierSpline, Point3, Vec3};
/// use curvum::spline::ControlPoint;
///
/// // Straight from x = 0 to x = 3, with the handles bunched near the start.
/// let spline: BezierSpline<f64> = BezierSpline::from_points(vec![
///     ControlPoint::new(Point3::origin(), Vec3::zero(), Vec3::new(0.1, 0.0, 0.0)),
///     ControlPoint::new(Point3::new(3.0, 0.0, 0.0), Vec3::new(-2.8, 0.0, 0.0), Vec3::zero()),
/// ]);
///
/// let table = spline.arc_length_table(1e-4);
/// let u = table.parameter_at_distance(1.5);
/// let halfway = spline.evaluate_normalized(u)?;
/// assert!((halfway.x - 1.5).abs() < 1e-3);
/// # Ok::<(), curvum::SplineError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ArcLengthTable<F> {
    /// `(u, distance from the start)`, strictly increasing in `u`.
    samples: Vec<(F, F)>,
}

impl<F: Float> ArcLengthTable<F> {
    /// Samples `spline` so that interpolating between entries is accurate to
    /// about `tolerance`.
    ///
    /// Splines with fewer than two points produce an empty table of length zero.
    pub fn new(spline: &BezierSpline<F>, tolerance: F) -> Self {
        let count = spline.num_segments();
        if count == 0 {
            return Self {
                samples: Vec::new(),
            };
        }

        let count: F = cast(count);
        let mut samples = vec![(F::zero(), F::zero())];
        let mut distance = F::zero();
        let mut pieces = Vec::new();
        for (index, segment) in spline.segments().enumerate() {
            let offset: F = cast(index);
            let mut previous = segment.p0;
            pieces.clear();
            segment.sample_uniform_into(tolerance, &mut pieces);
            for &(t, point) in &pieces {
                distance = distance + previous.distance(point);
                previous = point;
                samples.push(((offset + t) / count, distance));
            }
        }

        log::trace!("arc length table built with {} samples", samples.len());
        Self { samples }
    }

    /// Total length of the sampled curve.
    pub fn total_length(&self) -> F {
        self.samples.last().map_or(F::zero(), |&(_, s)| s)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Normalized parameter `u` reached after travelling `distance` from the start.
    ///
    /// Distances are clamped to `[0, total_length]`; NaN resolves to the start.
    pub fn parameter_at_distance(&self, distance: F) -> F {
        let total = self.total_length();
        if !(distance > F::zero()) {
            return F::zero();
        }
        if distance >= total {
            return self.end_parameter();
        }

        // samples[0] sits at distance 0 < distance <= total, so 1 <= idx < len.
        let idx = self.samples.partition_point(|&(_, s)| s < distance);
        let (u0, s0) = self.samples[idx - 1];
        let (u1, s1) = self.samples[idx];
        u0 + (u1 - u0) * ((distance - s0) / (s1 - s0))
    }

    /// Normalized parameter `u` reached after covering `fraction` of the length.
    ///
    /// A fraction of one or more lands on the end, even on a zero-length curve.
    pub fn parameter_at_fraction(&self, fraction: F) -> F {
        if fraction >= F::one() {
            self.end_parameter()
        } else {
            self.parameter_at_distance(fraction * self.total_length())
        }
    }

    fn end_parameter(&self) -> F {
        self.samples.last().map_or(F::zero(), |&(u, _)| u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{Point3, Vec3};
    use crate::spline::ControlPoint;
    use approx::assert_relative_eq;

    fn bunched() -> BezierSpline<f64> {
        BezierSpline::from_points(vec![
            ControlPoint::new(Point3::origin(), Vec3::zero(), Vec3::new(0.1, 0.0, 0.0)),
            ControlPoint::new(
                Point3::new(3.0, 0.0, 0.0),
                Vec3::new(-2.8, 0.0, 0.0),
                Vec3::zero(),
            ),
        ])
    }

    #[test]
    fn test_inverts_uneven_parameterization() {
        let spline = bunched();
        let table = ArcLengthTable::new(&spline, 1e-4);
        assert_relative_eq!(table.total_length(), 3.0, epsilon = 1e-9);
        for &d in &[0.3, 1.0, 1.5, 2.25, 2.9] {
            let u = table.parameter_at_distance(d);
            let p = spline.evaluate_normalized(u).unwrap();
            assert_relative_eq!(p.x, d, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_ends_and_clamping() {
        let table = ArcLengthTable::new(&bunched(), 1e-3);
        assert_eq!(table.parameter_at_distance(0.0), 0.0);
        assert_eq!(table.parameter_at_distance(-1.0), 0.0);
        assert_eq!(table.parameter_at_distance(f64::NAN), 0.0);
        assert_eq!(table.parameter_at_distance(3.5), 1.0);
        assert_eq!(table.parameter_at_distance(10.0), 1.0);
        assert_eq!(table.parameter_at_fraction(1.0), 1.0);
    }

    #[test]
    fn test_multi_segment_parameters_are_normalized() {
        let point = |x: f64| {
            ControlPoint::new(
                Point3::new(x, 0.0, 0.0),
                Vec3::new(-1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
            )
        };
        let spline = BezierSpline::from_points(vec![point(0.0), point(3.0), point(6.0)]);
        let table = ArcLengthTable::new(&spline, 1e-6);
        assert_eq!(table.len(), 3);
        assert_relative_eq!(table.parameter_at_distance(3.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(table.parameter_at_fraction(0.75), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_splines() {
        let empty: BezierSpline<f64> = BezierSpline::new();
        let table = ArcLengthTable::new(&empty, 1e-3);
        assert!(table.is_empty());
        assert_eq!(table.total_length(), 0.0);
        assert_eq!(table.parameter_at_distance(1.0), 0.0);

        let p = ControlPoint::new(Point3::new(1.0, 1.0, 1.0), Vec3::zero(), Vec3::zero());
        let collapsed = BezierSpline::from_points(vec![p, p]);
        let table = ArcLengthTable::new(&collapsed, 1e-3);
        assert_eq!(table.total_length(), 0.0);
        assert_eq!(table.parameter_at_fraction(0.0), 0.0);
        assert_eq!(table.parameter_at_fraction(1.0), 1.0);
    }
}
