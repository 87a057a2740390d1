//! Error types for path construction.

use thiserror::Error;

/// Errors that can occur while building a path from waypoints.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PathError {
    /// Waypoints do not all share the same dimension.
    #[error("waypoint dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension of the first waypoint.
        expected: usize,
        /// Dimension of the offending waypoint.
        actual: usize,
    },

    /// The blend deviation tolerance is negative.
    #[error("invalid blend deviation: {0} (must be non-negative)")]
    InvalidDeviation(f64),
}

impl PathError {
    /// Create a dimension mismatch error.
    #[must_use]
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Check if this is a dimension mismatch error.
    #[must_use]
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Self::DimensionMismatch { .. })
    }

    /// Check if this is an invalid deviation error.
    #[must_use]
    pub fn is_invalid_deviation(&self) -> bool {
        matches!(self, Self::InvalidDeviation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PathError::dimension_mismatch(3, 2);
        assert!(err.to_string().contains("expected 3"));
        assert!(err.to_string().contains("got 2"));

        let err = PathError::InvalidDeviation(-0.5);
        assert!(err.to_string().contains("-0.5"));
    }

    #[test]
    fn test_error_predicates() {
        let err = PathError::dimension_mismatch(3, 2);
        assert!(err.is_dimension_mismatch());
        assert!(!err.is_invalid_deviation());

        let err = PathError::InvalidDeviation(-1.0);
        assert!(err.is_invalid_deviation());
        assert!(!err.is_dimension_mismatch());
    }
}
