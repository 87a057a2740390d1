//! Error types for trajectory generation.

use crate::PhasePoint;
use thiserror::Error;

/// Errors that can occur while generating or configuring a trajectory.
///
/// The two integration failures carry the diagnostic tail of backward steps
/// computed before the failure was detected, for phase-plane inspection.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrajectoryError {
    /// The path has no segments or zero arc length.
    #[error("cannot time a path with zero length")]
    EmptyPath,

    /// Limit vectors and path disagree on dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// The integration time step is not strictly positive.
    #[error("invalid time step: {0} (must be positive)")]
    InvalidTimeStep(f64),

    /// A velocity or acceleration limit is not strictly positive.
    #[error("invalid limit on axis {axis}: {value} (must be positive)")]
    InvalidLimit {
        /// Axis of the offending limit entry.
        axis: usize,
        /// The offending value.
        value: f64,
    },

    /// Phase-plane integration drove the path velocity below zero.
    #[error("path velocity became negative near s = {path_pos}")]
    NegativeVelocity {
        /// Arc length at which the velocity went negative.
        path_pos: f64,
        /// Backward steps computed before the failure, in increasing
        /// arc-length order.
        tail: Vec<PhasePoint>,
    },

    /// Backward integration reached the path start without rejoining the
    /// forward profile.
    #[error("deceleration profile never rejoined the forward pass (from s = {path_pos})")]
    NoIntersection {
        /// Arc length the backward pass started from.
        path_pos: f64,
        /// The full backward arc, in increasing arc-length order.
        tail: Vec<PhasePoint>,
    },
}

impl TrajectoryError {
    /// Create a dimension mismatch error.
    #[must_use]
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Check if this is a divergence of the phase-plane integration (either
    /// failure kind).
    #[must_use]
    pub fn is_integration_failure(&self) -> bool {
        matches!(
            self,
            Self::NegativeVelocity { .. } | Self::NoIntersection { .. }
        )
    }

    /// Get the diagnostic backward steps retained by an integration
    /// failure, if any.
    #[must_use]
    pub fn diagnostic_tail(&self) -> Option<&[PhasePoint]> {
        match self {
            Self::NegativeVelocity { tail, .. } | Self::NoIntersection { tail, .. } => {
                Some(tail)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrajectoryError::dimension_mismatch(3, 2);
        assert!(err.to_string().contains("expected 3"));

        let err = TrajectoryError::InvalidTimeStep(0.0);
        assert!(err.to_string().contains("0"));

        let err = TrajectoryError::InvalidLimit {
            axis: 1,
            value: -2.0,
        };
        assert!(err.to_string().contains("axis 1"));
        assert!(err.to_string().contains("-2"));
    }

    #[test]
    fn test_integration_failure_predicate() {
        let err = TrajectoryError::NegativeVelocity {
            path_pos: 1.0,
            tail: vec![PhasePoint::new(0.9, 0.1)],
        };
        assert!(err.is_integration_failure());
        assert_eq!(err.diagnostic_tail().map(|tail| tail.len()), Some(1));

        let err = TrajectoryError::EmptyPath;
        assert!(!err.is_integration_failure());
        assert!(err.diagnostic_tail().is_none());
    }
}
