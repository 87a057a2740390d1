//! Per-axis kinematic limits.

use crate::TrajectoryError;
use path_types::Config;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Symmetric per-axis velocity and acceleration bounds.
///
/// Both vectors must share one dimension and every entry must be strictly
/// positive; the bounds apply symmetrically (`|v_i| <= max_velocity[i]`,
/// `|a_i| <= max_acceleration[i]`).
///
/// # Example
///
/// ```
/// use path_timing::KinematicLimits;
/// use nalgebra::dvector;
///
/// let limits = KinematicLimits::new(dvector![1.0, 1.0, 0.5], dvector![2.0, 2.0, 1.0]).unwrap();
/// assert_eq!(limits.dim(), 3);
///
/// // Zero or negative entries are rejected
/// assert!(KinematicLimits::new(dvector![1.0, 0.0], dvector![1.0, 1.0]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KinematicLimits {
    /// Per-axis velocity bound.
    max_velocity: Config,
    /// Per-axis acceleration bound.
    max_acceleration: Config,
}

impl KinematicLimits {
    /// Create validated limits.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::DimensionMismatch`] if the vectors differ
    /// in length and [`TrajectoryError::InvalidLimit`] for any entry that is
    /// not strictly positive (NaN included).
    pub fn new(max_velocity: Config, max_acceleration: Config) -> Result<Self, TrajectoryError> {
        if max_velocity.len() != max_acceleration.len() {
            return Err(TrajectoryError::dimension_mismatch(
                max_velocity.len(),
                max_acceleration.len(),
            ));
        }
        for (axis, &value) in max_velocity.iter().chain(max_acceleration.iter()).enumerate() {
            if value.is_nan() || value <= 0.0 {
                return Err(TrajectoryError::InvalidLimit {
                    axis: axis % max_velocity.len(),
                    value,
                });
            }
        }
        Ok(Self {
            max_velocity,
            max_acceleration,
        })
    }

    /// Create uniform limits with the same bound on every axis.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::InvalidLimit`] if either bound is not
    /// strictly positive.
    pub fn uniform(
        dim: usize,
        max_velocity: f64,
        max_acceleration: f64,
    ) -> Result<Self, TrajectoryError> {
        Self::new(
            Config::repeat(dim, max_velocity),
            Config::repeat(dim, max_acceleration),
        )
    }

    /// Get the per-axis velocity bound.
    #[must_use]
    pub fn max_velocity(&self) -> &Config {
        &self.max_velocity
    }

    /// Get the per-axis acceleration bound.
    #[must_use]
    pub fn max_acceleration(&self) -> &Config {
        &self.max_acceleration
    }

    /// Get the dimension the limits apply to.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.max_velocity.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    #[test]
    fn test_valid_limits() {
        let limits = KinematicLimits::new(dvector![1.0, 2.0], dvector![0.5, 0.5]);
        assert!(limits.is_ok());
    }

    #[test]
    fn test_uniform() {
        let limits = KinematicLimits::uniform(3, 1.0, 2.0).unwrap();
        assert_eq!(limits.dim(), 3);
        assert_eq!(limits.max_velocity()[2], 1.0);
        assert_eq!(limits.max_acceleration()[0], 2.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = KinematicLimits::new(dvector![1.0, 1.0], dvector![1.0]).unwrap_err();
        assert!(matches!(err, TrajectoryError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_rejects_non_positive_entries() {
        for bad in [0.0, -1.0, f64::NAN] {
            let err = KinematicLimits::new(dvector![1.0, bad], dvector![1.0, 1.0]).unwrap_err();
            assert!(matches!(err, TrajectoryError::InvalidLimit { axis: 1, .. }));
        }

        let err = KinematicLimits::uniform(2, 1.0, -0.5).unwrap_err();
        assert!(matches!(err, TrajectoryError::InvalidLimit { .. }));
    }
}
