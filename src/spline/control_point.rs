//! Control points and their tangent handle constraints.

use crate::error::{Result, SplineError};
use crate::primitives::{Frame3, Point3, Vec3};
use num_traits::Float;

/// How a control point's two tangent handles relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HandleMode {
    /// Tangents are independent.
    #[default]
    Free,
    /// The outgoing tangent is always the negation of the incoming one.
    Mirrored,
    /// Tangents are unit vectors pointing at the neighbouring control points.
    Linear,
}

/// A node of a Bézier spline: a position and two tangent handles.
///
/// Tangents are stored relative to the position, so moving a point carries
/// its handles along. The point does not know its neighbours; constraints
/// that depend on them ([`HandleMode::Linear`]) are applied by the owning
/// spline through [`ControlPoint::reposition_tangents`].
///
/// # Example
///
/// ```
/// use curvum::{Point3, Vec3};
/// use curvum::spline::{ControlPoint, HandleMode};
///
/// let mut point: ControlPoint<f64> = ControlPoint::new(
///     Point3::origin(),
///     Vec3::new(2.0, 0.0, 0.0),
///     Vec3::new(5.0, 0.0, 0.0),
/// );
/// point.set_handle_mode(HandleMode::Mirrored);
/// assert_eq!(point.outgoing_tangent(), Vec3::new(-2.0, 0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlPoint<F> {
    position: Point3<F>,
    incoming_tangent: Vec3<F>,
    outgoing_tangent: Vec3<F>,
    #[cfg_attr(feature = "serde", serde(default))]
    handle_mode: HandleMode,
}

impl<F: Float> ControlPoint<F> {
    /// Creates a free control point.
    pub fn new(position: Point3<F>, incoming_tangent: Vec3<F>, outgoing_tangent: Vec3<F>) -> Self {
        Self {
            position,
            incoming_tangent,
            outgoing_tangent,
            handle_mode: HandleMode::Free,
        }
    }

    /// Returns this point with `mode` applied, as [`set_handle_mode`](Self::set_handle_mode) would.
    pub fn with_handle_mode(mut self, mode: HandleMode) -> Self {
        self.set_handle_mode(mode);
        self
    }

    #[inline]
    pub fn position(&self) -> Point3<F> {
        self.position
    }

    #[inline]
    pub fn incoming_tangent(&self) -> Vec3<F> {
        self.incoming_tangent
    }

    #[inline]
    pub fn outgoing_tangent(&self) -> Vec3<F> {
        self.outgoing_tangent
    }

    #[inline]
    pub fn handle_mode(&self) -> HandleMode {
        self.handle_mode
    }

    /// Moves the point. Tangents are relative and move with it.
    #[inline]
    pub fn set_position(&mut self, position: Point3<F>) {
        self.position = position;
    }

    /// Sets the incoming tangent; a mirrored point also flips its outgoing tangent.
    pub fn set_incoming_tangent(&mut self, tangent: Vec3<F>) {
        self.incoming_tangent = tangent;
        if self.handle_mode == HandleMode::Mirrored {
            self.outgoing_tangent = -tangent;
        }
    }

    /// Sets the outgoing tangent; a mirrored point also flips its incoming tangent.
    pub fn set_outgoing_tangent(&mut self, tangent: Vec3<F>) {
        self.outgoing_tangent = tangent;
        if self.handle_mode == HandleMode::Mirrored {
            self.incoming_tangent = -tangent;
        }
    }

    /// Stores the handle mode and re-derives the tangents.
    ///
    /// A standalone point has no neighbours, so [`HandleMode::Linear`]
    /// leaves the tangents as they are until the owning spline calls
    /// [`reposition_tangents`](Self::reposition_tangents).
    pub fn set_handle_mode(&mut self, mode: HandleMode) {
        self.handle_mode = mode;
        self.reposition_tangents(None, None);
    }

    /// Re-derives the tangents for the current handle mode.
    ///
    /// `previous` and `next` are the positions of the neighbouring control
    /// points, if any. For [`HandleMode::Linear`] each side with a neighbour
    /// gets a unit tangent toward it; a missing neighbour, or one sitting on
    /// top of this point, leaves that side untouched.
    pub fn reposition_tangents(&mut self, previous: Option<Point3<F>>, next: Option<Point3<F>>) {
        match self.handle_mode {
            HandleMode::Free => {}
            HandleMode::Mirrored => self.outgoing_tangent = -self.incoming_tangent,
            HandleMode::Linear => {
                if let Some(dir) = next.and_then(|n| (n - self.position).normalize()) {
                    self.outgoing_tangent = dir;
                }
                if let Some(dir) = previous.and_then(|p| (p - self.position).normalize()) {
                    self.incoming_tangent = dir;
                }
            }
        }
    }

    /// Position of the incoming handle in the spline's local space.
    #[inline]
    pub fn incoming_handle(&self) -> Point3<F> {
        self.position + self.incoming_tangent
    }

    /// Position of the outgoing handle in the spline's local space.
    #[inline]
    pub fn outgoing_handle(&self) -> Point3<F> {
        self.position + self.outgoing_tangent
    }

    /// Places the incoming handle at a local-space position.
    pub fn set_incoming_handle(&mut self, handle: Point3<F>) {
        self.set_incoming_tangent(handle - self.position);
    }

    /// Places the outgoing handle at a local-space position.
    pub fn set_outgoing_handle(&mut self, handle: Point3<F>) {
        self.set_outgoing_tangent(handle - self.position);
    }

    /// Position of the point in the frame's world space.
    pub fn world_position<T: Frame3<F>>(&self, frame: &T) -> Point3<F> {
        frame.point_to_world(self.position)
    }

    /// Incoming handle in the frame's world space.
    pub fn incoming_handle_world<T: Frame3<F>>(&self, frame: &T) -> Point3<F> {
        frame.point_to_world(self.incoming_handle())
    }

    /// Outgoing handle in the frame's world space.
    pub fn outgoing_handle_world<T: Frame3<F>>(&self, frame: &T) -> Point3<F> {
        frame.point_to_world(self.outgoing_handle())
    }

    /// Moves the point to a world-space position.
    ///
    /// Fails with [`SplineError::SingularFrame`] if the frame cannot be inverted.
    pub fn set_world_position<T: Frame3<F>>(&mut self, frame: &T, position: Point3<F>) -> Result<()> {
        let local = frame
            .point_to_local(position)
            .ok_or(SplineError::SingularFrame)?;
        self.position = local;
        Ok(())
    }
}

impl<F: Float> Default for ControlPoint<F> {
    fn default() -> Self {
        Self::new(Point3::origin(), Vec3::zero(), Vec3::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Affine3;
    use approx::assert_relative_eq;

    fn free_point() -> ControlPoint<f64> {
        ControlPoint::new(
            Point3::origin(),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(5.0, 0.0, 0.0),
        )
    }

    #[test]
    fn test_new_is_free() {
        let p = free_point();
        assert_eq!(p.handle_mode(), HandleMode::Free);
        assert_eq!(p.incoming_tangent(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(p.outgoing_tangent(), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_free_tangents_are_independent() {
        let mut p = free_point();
        p.set_incoming_tangent(Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(p.outgoing_tangent(), Vec3::new(5.0, 0.0, 0.0));
        p.set_outgoing_tangent(Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(p.incoming_tangent(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_switch_to_mirrored_negates_incoming() {
        let mut p = free_point();
        p.set_handle_mode(HandleMode::Mirrored);
        assert_eq!(p.incoming_tangent(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(p.outgoing_tangent(), Vec3::new(-2.0, 0.0, 0.0));
    }

    #[test]
    fn test_mirrored_holds_after_either_write() {
        let mut p = free_point().with_handle_mode(HandleMode::Mirrored);

        p.set_incoming_tangent(Vec3::new(1.0, -3.0, 0.5));
        assert_eq!(p.outgoing_tangent(), -p.incoming_tangent());

        p.set_outgoing_tangent(Vec3::new(4.0, 4.0, -1.0));
        assert_eq!(p.incoming_tangent(), Vec3::new(-4.0, -4.0, 1.0));
        assert_eq!(p.outgoing_tangent(), -p.incoming_tangent());

        p.set_incoming_handle(Point3::new(0.0, 2.0, 0.0));
        assert_eq!(p.outgoing_tangent(), Vec3::new(0.0, -2.0, 0.0));
    }

    #[test]
    fn test_linear_points_at_neighbours() {
        let mut p = free_point();
        p.set_handle_mode(HandleMode::Linear);
        // No neighbours yet: tangents untouched.
        assert_eq!(p.incoming_tangent(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(p.outgoing_tangent(), Vec3::new(5.0, 0.0, 0.0));

        p.reposition_tangents(Some(Point3::new(-3.0, 0.0, 0.0)), Some(Point3::new(0.0, 4.0, 0.0)));
        assert_eq!(p.incoming_tangent(), Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(p.outgoing_tangent(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_linear_one_sided() {
        let mut p = free_point().with_handle_mode(HandleMode::Linear);
        p.reposition_tangents(None, Some(Point3::new(3.0, 4.0, 0.0)));
        assert_eq!(p.incoming_tangent(), Vec3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(p.outgoing_tangent().x, 0.6, epsilon = 1e-12);
        assert_relative_eq!(p.outgoing_tangent().y, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_ignores_coincident_neighbour() {
        let mut p = free_point().with_handle_mode(HandleMode::Linear);
        p.reposition_tangents(Some(Point3::origin()), None);
        assert_eq!(p.incoming_tangent(), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_handles_follow_position() {
        let mut p = free_point();
        p.set_position(Point3::new(1.0, 1.0, 1.0));
        assert_eq!(p.incoming_handle(), Point3::new(3.0, 1.0, 1.0));
        assert_eq!(p.outgoing_handle(), Point3::new(6.0, 1.0, 1.0));

        p.set_outgoing_handle(Point3::new(1.0, 1.0, 0.0));
        assert_eq!(p.outgoing_tangent(), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_world_accessors() {
        let frame: Affine3<f64> = Affine3::translation(Vec3::new(10.0, 0.0, 0.0));
        let mut p = free_point();
        assert_eq!(p.world_position(&frame), Point3::new(10.0, 0.0, 0.0));
        assert_eq!(p.incoming_handle_world(&frame), Point3::new(12.0, 0.0, 0.0));
        assert_eq!(p.outgoing_handle_world(&frame), Point3::new(15.0, 0.0, 0.0));

        p.set_world_position(&frame, Point3::new(11.0, 2.0, 0.0)).unwrap();
        assert_eq!(p.position(), Point3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_world_position_through_singular_frame() {
        let frame: Affine3<f64> = Affine3::scale(0.0);
        let mut p = free_point();
        let err = p.set_world_position(&frame, Point3::origin()).unwrap_err();
        assert_eq!(err, SplineError::SingularFrame);
        assert_eq!(p.position(), Point3::origin());
    }
}
