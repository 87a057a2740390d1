//! Phase-plane diagnostics.
//!
//! The limit curves bounding the feasible phase-plane region are useful for
//! plotting and for understanding why a trajectory slows down where it
//! does. This module samples them as plain data.

use crate::solver::Solver;
use crate::{KinematicLimits, SolverOptions, TrajectoryError};
use path_types::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Both limit curves evaluated at one arc length.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LimitCurveSample {
    /// Arc length of the sample.
    pub path_pos: f64,
    /// Velocity limit curve value.
    pub velocity_limit: f64,
    /// Acceleration limit curve value; `f64::INFINITY` where no curvature
    /// constrains the velocity (straight path sections).
    pub acceleration_limit: f64,
}

/// Sample both limit curves uniformly along the path.
///
/// Takes `samples` evenly spaced arc lengths over `[0, length]` (at least
/// two).
///
/// # Errors
///
/// Returns [`TrajectoryError::EmptyPath`] for a zero-length path and
/// [`TrajectoryError::DimensionMismatch`] if path and limits disagree.
///
/// # Example
///
/// ```
/// use path_timing::{sample_limit_curves, KinematicLimits};
/// use path_types::Path;
/// use nalgebra::dvector;
///
/// let path = Path::new(
///     &[
///         dvector![0.0, 0.0, 0.0],
///         dvector![1.0, 0.0, 0.0],
///         dvector![1.0, 1.0, 0.0],
///     ],
///     0.1,
/// )
/// .unwrap();
/// let limits = KinematicLimits::uniform(3, 1.0, 1.0).unwrap();
///
/// let samples = sample_limit_curves(&path, &limits, 100).unwrap();
/// assert_eq!(samples.len(), 100);
///
/// // Straight sections carry no acceleration limit; the blend does
/// assert!(samples.first().unwrap().acceleration_limit.is_infinite());
/// assert!(samples.iter().any(|s| s.acceleration_limit.is_finite()));
/// ```
pub fn sample_limit_curves(
    path: &Path,
    limits: &KinematicLimits,
    samples: usize,
) -> Result<Vec<LimitCurveSample>, TrajectoryError> {
    if path.is_empty() || path.length() <= 0.0 {
        return Err(TrajectoryError::EmptyPath);
    }
    if limits.dim() != path.dim() {
        return Err(TrajectoryError::dimension_mismatch(path.dim(), limits.dim()));
    }

    let solver = Solver::new(path, limits, SolverOptions::new().time_step());
    let count = samples.max(2);
    let step = path.length() / (count - 1) as f64;

    Ok((0..count)
        .map(|i| {
            let path_pos = i as f64 * step;
            LimitCurveSample {
                path_pos,
                velocity_limit: solver.velocity_limit(path_pos),
                acceleration_limit: solver.acceleration_limit(path_pos),
            }
        })
        .collect())
}
