//! curvum - Piecewise cubic Bézier splines
//!
//! A spline is an ordered list of control points, each carrying a position
//! and two tangent handles. Consecutive points span one cubic Bézier
//! segment. Handle modes keep tangents mirrored or aimed at neighbouring
//! points as the spline is edited.
//!
//! ```
//! use curvum::{BezierSpline, Point3};
//! use curvum::spline::HandleMode;
//!
//! let mut spline: BezierSpline<f64> = BezierSpline::default();
//! spline.append_point()?;
//! spline.set_handle_mode(1, HandleMode::Mirrored)?;
//!
//! let start = spline.evaluate_normalized(0.0)?;
//! assert_eq!(start, Point3::new(-1.0, -1.0, 0.0));
//! let heading = spline.direction(1.5)?;
//! assert!(heading.is_some());
//! # Ok::<(), curvum::SplineError>(())
//! ```

pub mod curves;
pub mod error;
pub mod primitives;
pub mod spline;

pub use error::{Result, SplineError};
pub use primitives::{Affine3, Frame3, Point3, Vec3};
pub use spline::{BezierSpline, ControlPoint, HandleMode};
