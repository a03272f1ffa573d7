//! Moving a cursor along a spline over time.

use super::{cast, ArcLengthTable, BezierSpline};
use crate::error::{Result, SplineError};
use crate::primitives::Point3;
use num_traits::Float;

/// Smallest flattening tolerance a traverser accepts.
const MIN_TOLERANCE: f64 = 1e-6;

/// What happens when a traverser reaches the end of the spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraverseMode {
    /// Stop at the end.
    #[default]
    Once,
    /// Jump back to the start.
    Loop,
    /// Reverse direction at either end.
    PingPong,
}

/// How elapsed time converts into progress along the spline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraverseMethod<F> {
    /// Cover the whole spline in `duration` seconds, regardless of its length.
    Time { duration: F },
    /// Move `units_per_second` along the flattened curve.
    Speed { units_per_second: F },
}

/// Arc-length table of the spline last traversed at constant speed.
#[derive(Debug, Clone, PartialEq)]
struct ArcCache<F> {
    spline: BezierSpline<F>,
    tolerance: F,
    table: ArcLengthTable<F>,
}

/// A cursor that advances along a spline.
///
/// Under [`TraverseMethod::Time`] progress is the normalized curve parameter.
/// Under [`TraverseMethod::Speed`] it is the fraction of the curve's length
/// already covered, mapped back to a parameter through an
/// [`ArcLengthTable`]. The table is rebuilt only when the spline or the
/// tolerance changes.
///
/// # Example
///
/// ```
/// use curvum::BezierSpline;
/// use curvum::spline::{TraverseMethod, TraverseMode, Traverser};
///
/// let spline: BezierSpline<f64> = BezierSpline::default();
/// let mut traverser = Traverser::new(TraverseMode::Once, TraverseMethod::Time { duration: 2.0 })?;
///
/// traverser.advance(&spline, 1.0)?;
/// assert_eq!(traverser.progress(), 0.5);
///
/// let end = traverser.advance(&spline, 5.0)?;
/// assert!(traverser.is_finished());
/// assert_eq!(end, spline.evaluate_normalized(1.0)?);
/// # Ok::<(), curvum::SplineError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Traverser<F> {
    mode: TraverseMode,
    method: TraverseMethod<F>,
    tolerance: F,
    /// Progress in [0, 1], or [0, 2) for ping-pong where (1, 2) is the way back.
    phase: F,
    arc_cache: Option<ArcCache<F>>,
}

impl<F: Float> Traverser<F> {
    /// Creates a traverser at the start of the spline.
    ///
    /// Fails if the duration or speed is not a positive finite number.
    pub fn new(mode: TraverseMode, method: TraverseMethod<F>) -> Result<Self> {
        let rate = match method {
            TraverseMethod::Time { duration } => duration,
            TraverseMethod::Speed { units_per_second } => units_per_second,
        };
        if !(rate.is_finite() && rate > F::zero()) {
            return Err(SplineError::InvalidParameter(
                "traverse duration and speed must be positive and finite",
            ));
        }

        Ok(Self {
            mode,
            method,
            tolerance: cast(1e-3),
            phase: F::zero(),
            arc_cache: None,
        })
    }

    /// Sets the flattening tolerance used to measure arc length in
    /// [`TraverseMethod::Speed`].
    ///
    /// Values below `1e-6` (including zero, negatives and NaN) are raised to
    /// `1e-6`. Finer tolerances sample the curve more densely; the cost is
    /// paid once per spline change, not per step.
    pub fn with_tolerance(mut self, tolerance: F) -> Self {
        self.tolerance = tolerance.max(cast(MIN_TOLERANCE));
        self
    }

    #[inline]
    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    #[inline]
    pub fn mode(&self) -> TraverseMode {
        self.mode
    }

    #[inline]
    pub fn method(&self) -> TraverseMethod<F> {
        self.method
    }

    /// How far along the spline the cursor is, in [0, 1].
    ///
    /// A parameter fraction under [`TraverseMethod::Time`], a distance
    /// fraction under [`TraverseMethod::Speed`].
    pub fn progress(&self) -> F {
        if self.phase > F::one() {
            (F::one() + F::one()) - self.phase
        } else {
            self.phase
        }
    }

    /// `true` while progress is increasing.
    pub fn is_moving_forward(&self) -> bool {
        match self.mode {
            TraverseMode::PingPong => self.phase < F::one(),
            TraverseMode::Loop => true,
            TraverseMode::Once => !self.is_finished(),
        }
    }

    /// `true` once a [`TraverseMode::Once`] traverser has reached the end.
    pub fn is_finished(&self) -> bool {
        self.mode == TraverseMode::Once && self.phase >= F::one()
    }

    /// Moves back to the start of the spline.
    pub fn reset(&mut self) {
        self.phase = F::zero();
    }

    /// Current position on the spline without advancing.
    pub fn position(&self, spline: &BezierSpline<F>) -> Result<Point3<F>> {
        let progress = self.progress();
        let u = match self.method {
            TraverseMethod::Time { .. } => progress,
            TraverseMethod::Speed { .. } => {
                spline.require_evaluable()?;
                match self.cached_table(spline) {
                    Some(table) => table.parameter_at_fraction(progress),
                    None => spline
                        .arc_length_table(self.tolerance)
                        .parameter_at_fraction(progress),
                }
            }
        };
        spline.evaluate_normalized(u)
    }

    /// Advances by `dt` seconds and returns the new position on the spline.
    pub fn advance(&mut self, spline: &BezierSpline<F>, dt: F) -> Result<Point3<F>> {
        spline.require_evaluable()?;
        if !(dt.is_finite() && dt >= F::zero()) {
            return Err(SplineError::InvalidParameter(
                "time step must be non-negative and finite",
            ));
        }

        let step = match self.method {
            TraverseMethod::Time { duration } => dt / duration,
            TraverseMethod::Speed { units_per_second } => {
                let length = self.measure(spline);
                if length > F::epsilon() {
                    units_per_second * dt / length
                } else {
                    // A spline collapsed to a point is crossed instantly.
                    F::one()
                }
            }
        };

        let phase = self.phase + step;
        self.phase = match self.mode {
            TraverseMode::Once => {
                if phase >= F::one() && self.phase < F::one() {
                    log::debug!("traverser reached the end of the spline");
                }
                phase.min(F::one())
            }
            TraverseMode::Loop => phase - phase.floor(),
            TraverseMode::PingPong => {
                let period = F::one() + F::one();
                phase - (phase / period).floor() * period
            }
        };

        self.position(spline)
    }

    fn cached_table(&self, spline: &BezierSpline<F>) -> Option<&ArcLengthTable<F>> {
        self.arc_cache
            .as_ref()
            .filter(|cache| cache.tolerance == self.tolerance && cache.spline == *spline)
            .map(|cache| &cache.table)
    }

    /// Length of `spline`, rebuilding the cached arc-length table if stale.
    fn measure(&mut self, spline: &BezierSpline<F>) -> F {
        if let Some(table) = self.cached_table(spline) {
            return table.total_length();
        }

        log::debug!("rebuilding arc length table for {} points", spline.len());
        let table = spline.arc_length_table(self.tolerance);
        let length = table.total_length();
        self.arc_cache = Some(ArcCache {
            spline: spline.clone(),
            tolerance: self.tolerance,
            table,
        });
        length
    }
}
