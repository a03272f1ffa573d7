//! Piecewise cubic Bézier splines.

use super::{cast, ArcLengthTable, ControlPoint, HandleMode};
use crate::curves::{polyline_length, CubicBezier3};
use crate::error::{Result, SplineError};
use crate::primitives::{Frame3, Point3, Vec3};
use num_traits::Float;

/// An ordered sequence of control points forming a piecewise cubic Bézier curve.
///
/// Segment `i` runs from `points[i]` to `points[i + 1]`, pulled by the
/// outgoing handle of the first and the incoming handle of the second. The
/// neighbours of a point are its index neighbours; the spline never loops.
///
/// Curve queries take a parameter `t` in `[0, len - 1]` (integer values land
/// on control points) or a normalized `u` in `[0, 1]`. Out-of-range
/// parameters are clamped.
///
/// Edits go through the spline so that handle-mode constraints that depend
/// on neighbours stay satisfied.
///
/// # Example
///
/// ```
/// use curvum::{BezierSpline, Point3, Vec3};
/// use curvum::spline::ControlPoint;
///
/// let spline: BezierSpline<f64> = BezierSpline::from_points(vec![
///     ControlPoint::new(Point3::new(0.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
///     ControlPoint::new(Point3::new(3.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
/// ]);
///
/// assert_eq!(spline.evaluate(0.5)?, Point3::new(1.5, 0.0, 0.0));
/// assert_eq!(spline.evaluate_normalized(1.0)?, Point3::new(3.0, 0.0, 0.0));
/// # Ok::<(), curvum::SplineError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        from = "Vec<ControlPoint<F>>",
        into = "Vec<ControlPoint<F>>",
        bound(
            serialize = "F: Float + serde::Serialize",
            deserialize = "F: Float + serde::Deserialize<'de>"
        )
    )
)]
pub struct BezierSpline<F> {
    points: Vec<ControlPoint<F>>,
}

impl<F: Float> BezierSpline<F> {
    /// Creates an empty spline.
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Creates a spline from an ordered list of control points.
    ///
    /// Every point's handle-mode constraint is applied against its neighbours.
    pub fn from_points(points: Vec<ControlPoint<F>>) -> Self {
        let mut spline = Self { points };
        for i in 0..spline.points.len() {
            spline.reposition(i);
        }
        spline
    }

    /// Number of control points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of curve segments (`len - 1`, or zero).
    #[inline]
    pub fn num_segments(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Valid range of the curve parameter `t`.
    pub fn domain(&self) -> (F, F) {
        (F::zero(), cast(self.num_segments()))
    }

    #[inline]
    pub fn points(&self) -> &[ControlPoint<F>] {
        &self.points
    }

    #[inline]
    pub fn point(&self, index: usize) -> Option<&ControlPoint<F>> {
        self.points.get(index)
    }

    /// The control point before `index`, if any.
    pub fn previous(&self, index: usize) -> Option<&ControlPoint<F>> {
        if index < self.points.len() {
            index.checked_sub(1).and_then(|i| self.points.get(i))
        } else {
            None
        }
    }

    /// The control point after `index`, if any.
    pub fn next(&self, index: usize) -> Option<&ControlPoint<F>> {
        if index < self.points.len() {
            self.points.get(index + 1)
        } else {
            None
        }
    }

    /// Consumes the spline, returning its control points.
    pub fn into_points(self) -> Vec<ControlPoint<F>> {
        self.points
    }

    /// Returns segment `index` as a standalone curve.
    pub fn segment(&self, index: usize) -> Option<CubicBezier3<F>> {
        let start = self.points.get(index)?;
        let end = self.points.get(index + 1)?;
        Some(span(start, end))
    }

    /// Iterates over every segment in order.
    pub fn segments(&self) -> impl Iterator<Item = CubicBezier3<F>> + '_ {
        self.points.windows(2).map(|w| span(&w[0], &w[1]))
    }

    /// Evaluates the curve position at `t` in `[0, len - 1]`.
    ///
    /// `t` is clamped to the domain; `t = len - 1` evaluates the last
    /// segment at its end. Fails if the spline has fewer than two points.
    pub fn evaluate(&self, t: F) -> Result<Point3<F>> {
        let (segment, local_t) = self.resolve_segment(t)?;
        Ok(segment.eval(local_t))
    }

    /// Evaluates the curve position at normalized `u` in `[0, 1]`.
    ///
    /// The ends return the first and last control point positions exactly.
    pub fn evaluate_normalized(&self, u: F) -> Result<Point3<F>> {
        let last = self.require_evaluable()? - 1;
        let u = clamp_parameter(u, F::one());
        if u <= F::zero() {
            Ok(self.points[0].position())
        } else if u >= F::one() {
            Ok(self.points[last].position())
        } else {
            self.evaluate(u * cast(last))
        }
    }

    /// Evaluates the curve derivative at `t` in `[0, len - 1]`.
    ///
    /// The result is not normalized; see [`direction`](Self::direction).
    pub fn tangent(&self, t: F) -> Result<Vec3<F>> {
        let (segment, local_t) = self.resolve_segment(t)?;
        Ok(segment.derivative_at(local_t))
    }

    /// Evaluates the curve derivative at normalized `u` in `[0, 1]`.
    pub fn tangent_normalized(&self, u: F) -> Result<Vec3<F>> {
        let last = self.require_evaluable()? - 1;
        let u = clamp_parameter(u, F::one());
        self.tangent(u * cast(last))
    }

    /// Unit direction of travel at `t`, or `None` where the derivative vanishes.
    pub fn direction(&self, t: F) -> Result<Option<Vec3<F>>> {
        Ok(self.tangent(t)?.normalize())
    }

    /// Unit direction of travel at normalized `u`.
    pub fn direction_normalized(&self, u: F) -> Result<Option<Vec3<F>>> {
        Ok(self.tangent_normalized(u)?.normalize())
    }

    /// Evaluates the curve at `t` and maps the result into the frame's world space.
    pub fn evaluate_world<T: Frame3<F>>(&self, frame: &T, t: F) -> Result<Point3<F>> {
        Ok(frame.point_to_world(self.evaluate(t)?))
    }

    /// Evaluates the derivative at `t` and maps it into the frame's world space.
    pub fn tangent_world<T: Frame3<F>>(&self, frame: &T, t: F) -> Result<Vec3<F>> {
        Ok(frame.vector_to_world(self.tangent(t)?))
    }

    /// Flattens the whole spline into a polyline.
    ///
    /// Control point positions appear exactly, in order. A single-point
    /// spline yields that point; an empty one yields nothing.
    pub fn to_polyline(&self, tolerance: F) -> Vec<Point3<F>> {
        let mut result = Vec::new();
        if let Some(first) = self.points.first() {
            result.push(first.position());
        }
        for segment in self.segments() {
            segment.flatten_into(tolerance, &mut result);
        }
        result
    }

    /// Approximate length of the whole curve.
    pub fn arc_length(&self, tolerance: F) -> F {
        polyline_length(&self.to_polyline(tolerance))
    }

    /// Samples cumulative arc length against the normalized parameter, for
    /// moving along the curve by distance. See [`ArcLengthTable`].
    pub fn arc_length_table(&self, tolerance: F) -> ArcLengthTable<F> {
        ArcLengthTable::new(self, tolerance)
    }

    /// Applies `edit` to the point at `index`, then re-applies the handle
    /// constraints of that point and its neighbours.
    ///
    /// # Example
    ///
    /// ```
    /// use curvum::{BezierSpline, Point3};
    ///
    /// let mut spline: BezierSpline<f64> = BezierSpline::default();
    /// spline.update_point(0, |p| p.set_position(Point3::origin()))?;
    /// assert_eq!(spline.evaluate(0.0)?, Point3::origin());
    /// # Ok::<(), curvum::SplineError>(())
    /// ```
    pub fn update_point<R>(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut ControlPoint<F>) -> R,
    ) -> Result<R> {
        let len = self.points.len();
        let point = self
            .points
            .get_mut(index)
            .ok_or(SplineError::IndexOutOfRange { index, len })?;
        let result = edit(point);
        self.reposition_around(index);
        Ok(result)
    }

    /// Moves a control point. Linear neighbours re-aim their tangents.
    pub fn set_position(&mut self, index: usize, position: Point3<F>) -> Result<()> {
        self.update_point(index, |p| p.set_position(position))
    }

    /// Sets a control point's incoming tangent under its handle mode.
    ///
    /// On a linear point, sides that have a neighbour keep pointing at it.
    pub fn set_incoming_tangent(&mut self, index: usize, tangent: Vec3<F>) -> Result<()> {
        self.update_point(index, |p| p.set_incoming_tangent(tangent))
    }

    /// Sets a control point's outgoing tangent under its handle mode.
    pub fn set_outgoing_tangent(&mut self, index: usize, tangent: Vec3<F>) -> Result<()> {
        self.update_point(index, |p| p.set_outgoing_tangent(tangent))
    }

    /// Changes a control point's handle mode and re-derives its tangents.
    pub fn set_handle_mode(&mut self, index: usize, mode: HandleMode) -> Result<()> {
        self.update_point(index, |p| p.set_handle_mode(mode))
    }

    /// Appends an explicit control point as the new tail.
    pub fn push(&mut self, point: ControlPoint<F>) {
        self.points.push(point);
        let tail = self.points.len() - 1;
        if tail > 0 {
            self.reposition(tail - 1);
        }
        self.reposition(tail);
        log::debug!("appended control point {} to spline", tail);
    }

    /// Extends the spline by one point, one unit along the last point's
    /// outgoing tangent, reusing that point's tangents.
    ///
    /// A zero outgoing tangent places the new point on top of the last one.
    /// Returns the index of the new point.
    ///
    /// # Example
    ///
    /// ```
    /// use curvum::{BezierSpline, Point3, Vec3};
    /// use curvum::spline::ControlPoint;
    ///
    /// let mut spline: BezierSpline<f64> = BezierSpline::from_points(vec![
    ///     ControlPoint::new(Point3::origin(), Vec3::zero(), Vec3::new(1.0, 0.0, 0.0)),
    ///     ControlPoint::new(Point3::new(3.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)),
    /// ]);
    ///
    /// let index = spline.append_point()?;
    /// assert_eq!(index, 2);
    /// assert_eq!(spline.points()[2].position(), Point3::new(4.0, 0.0, 0.0));
    /// # Ok::<(), curvum::SplineError>(())
    /// ```
    pub fn append_point(&mut self) -> Result<usize> {
        let last = self
            .points
            .last()
            .ok_or(SplineError::InsufficientPoints {
                required: 1,
                actual: 0,
            })?;

        let step = last.outgoing_tangent().normalize_or_zero();
        let point = ControlPoint::new(
            last.position() + step,
            last.incoming_tangent(),
            last.outgoing_tangent(),
        );
        self.push(point);
        Ok(self.points.len() - 1)
    }

    /// Returns the number of points, or fails if the curve cannot be evaluated.
    pub(crate) fn require_evaluable(&self) -> Result<usize> {
        let len = self.points.len();
        if len < 2 {
            return Err(SplineError::InsufficientPoints {
                required: 2,
                actual: len,
            });
        }
        Ok(len)
    }

    /// Maps `t` to the segment it falls on and the local parameter within it.
    fn resolve_segment(&self, t: F) -> Result<(CubicBezier3<F>, F)> {
        let last = self.require_evaluable()? - 1;
        let t = clamp_parameter(t, cast(last));
        // The last point has no outgoing segment.
        let index = t.floor().to_usize().unwrap_or(0).min(last - 1);
        let segment = span(&self.points[index], &self.points[index + 1]);
        Ok((segment, t - cast(index)))
    }

    fn reposition(&mut self, index: usize) {
        let previous = self.previous(index).map(ControlPoint::position);
        let next = self.next(index).map(ControlPoint::position);
        if let Some(point) = self.points.get_mut(index) {
            point.reposition_tangents(previous, next);
        }
    }

    fn reposition_around(&mut self, index: usize) {
        if index > 0 {
            self.reposition(index - 1);
        }
        self.reposition(index);
        self.reposition(index + 1);
    }
}

/// The segment pulled by `start`'s outgoing and `end`'s incoming handle.
fn span<F: Float>(start: &ControlPoint<F>, end: &ControlPoint<F>) -> CubicBezier3<F> {
    CubicBezier3::new(
        start.position(),
        start.outgoing_handle(),
        end.incoming_handle(),
        end.position(),
    )
}

/// Clamps a curve parameter to `[0, max]`. NaN resolves to 0.
fn clamp_parameter<F: Float>(t: F, max: F) -> F {
    let clamped = t.max(F::zero()).min(max);
    if clamped != t {
        log::trace!(
            "curve parameter {:?} clamped to {:?}",
            t.to_f64(),
            clamped.to_f64()
        );
    }
    clamped
}

impl<F: Float> Default for BezierSpline<F> {
    /// A two-point starter curve rising from `(-1, -1, 0)` to `(1, 1, 0)`.
    fn default() -> Self {
        let v = |x: f64, y: f64| Vec3::new(cast(x), cast(y), F::zero());
        let p = |x: f64, y: f64| Point3::new(cast(x), cast(y), F::zero());
        Self::from_points(vec![
            ControlPoint::new(p(-1.0, -1.0), v(-0.2, -0.5), v(0.2, 0.5)),
            ControlPoint::new(p(1.0, 1.0), v(-0.7, -0.5), v(0.7, 0.5)),
        ])
    }
}

impl<F: Float> From<Vec<ControlPoint<F>>> for BezierSpline<F> {
    fn from(points: Vec<ControlPoint<F>>) -> Self {
        Self::from_points(points)
    }
}

impl<F: Float> From<BezierSpline<F>> for Vec<ControlPoint<F>> {
    fn from(spline: BezierSpline<F>) -> Self {
        spline.into_points()
    }
}

impl<F: Float> FromIterator<ControlPoint<F>> for BezierSpline<F> {
    fn from_iter<I: IntoIterator<Item = ControlPoint<F>>>(iter: I) -> Self {
        Self::from_points(iter.into_iter().collect())
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use serde_json::json;

    fn payload() -> serde_json::Value {
        let zero = json!({ "x": 0.0, "y": 0.0, "z": 0.0 });
        json!([
            {
                "position": { "x": 0.0, "y": 0.0, "z": 0.0 },
                "incoming_tangent": zero.clone(),
                "outgoing_tangent": zero.clone()
            },
            {
                "position": { "x": 0.0, "y": 2.0, "z": 0.0 },
                "incoming_tangent": zero.clone(),
                "outgoing_tangent": zero.clone(),
                "handle_mode": "Linear"
            },
            {
                "position": { "x": 0.0, "y": 2.0, "z": 5.0 },
                "incoming_tangent": zero.clone(),
                "outgoing_tangent": zero
            }
        ])
    }

    #[test]
    fn test_deserialize_applies_constraints() {
        let spline: BezierSpline<f64> = serde_json::from_value(payload()).unwrap();
        assert_eq!(spline.len(), 3);
        let middle = spline.points()[1];
        assert_eq!(middle.handle_mode(), HandleMode::Linear);
        assert_eq!(middle.incoming_tangent(), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(middle.outgoing_tangent(), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_missing_handle_mode_is_free() {
        let spline: BezierSpline<f64> = serde_json::from_value(payload()).unwrap();
        assert_eq!(spline.points()[0].handle_mode(), HandleMode::Free);
        assert_eq!(spline.points()[2].handle_mode(), HandleMode::Free);
        assert_eq!(spline.points()[0].outgoing_tangent(), Vec3::zero());
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let mut spline: BezierSpline<f64> = serde_json::from_value(payload()).unwrap();
        spline.set_handle_mode(2, HandleMode::Mirrored).unwrap();
        spline.set_incoming_tangent(2, Vec3::new(0.5, -0.25, 1.0)).unwrap();

        let text = serde_json::to_string(&spline).unwrap();
        let back: BezierSpline<f64> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, spline);
        assert_eq!(back.points()[2].handle_mode(), HandleMode::Mirrored);
    }
}
