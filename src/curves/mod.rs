//! Stateless cubic Bézier math.

mod bezier;

pub use bezier::{cubic_derivative, cubic_point, CubicBezier3};
pub(crate) use bezier::polyline_length;
