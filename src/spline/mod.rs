//! Control points, piecewise Bézier splines and traversal.

mod arc_length;
mod bezier_spline;
mod control_point;
mod traverser;

pub use arc_length::ArcLengthTable;
pub use bezier_spline::BezierSpline;
pub use control_point::{ControlPoint, HandleMode};
pub use traverser::{TraverseMethod, TraverseMode, Traverser};

use num_traits::{Float, ToPrimitive};

/// Converts an index or literal into the spline's float type.
///
/// Every `usize` and `f64` is representable (possibly rounded) in `f32` and
/// `f64`, so the NaN fallback only triggers for exotic float types.
#[inline]
pub(crate) fn cast<F: Float, T: ToPrimitive>(value: T) -> F {
    F::from(value).unwrap_or_else(F::nan)
}
