//! Error types for spline operations.

use thiserror::Error;

/// Errors that can occur while querying or editing a spline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplineError {
    /// The spline does not hold enough control points for the operation.
    #[error("spline needs at least {required} control points, has {actual}")]
    InsufficientPoints {
        /// Minimum number of points the operation needs.
        required: usize,
        /// Number of points the spline holds.
        actual: usize,
    },

    /// A control point index is past the end of the spline.
    #[error("control point index {index} out of range for spline of {len} points")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of points in the spline.
        len: usize,
    },

    /// The coordinate frame cannot be inverted.
    #[error("coordinate frame is singular and cannot be inverted")]
    SingularFrame,

    /// A parameter is outside its valid domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
}

/// Result alias for spline operations.
pub type Result<T> = std::result::Result<T, SplineError>;
