//! Straight-line path segments.

use crate::Config;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A straight segment between two configurations, parameterised by arc length.
///
/// # Example
///
/// ```
/// use path_types::LinearSegment;
/// use nalgebra::dvector;
///
/// let segment = LinearSegment::new(dvector![0.0, 0.0, 0.0], dvector![3.0, 4.0, 0.0]);
///
/// assert!((segment.length() - 5.0).abs() < 1e-12);
///
/// // Halfway along the segment by arc length
/// let mid = segment.config_at(2.5);
/// assert!((mid[0] - 1.5).abs() < 1e-12);
/// assert!((mid[1] - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearSegment {
    /// Start configuration.
    start: Config,
    /// End configuration.
    end: Config,
    /// Arc length (cached).
    length: f64,
}

impl LinearSegment {
    /// Create a segment between two configurations.
    #[must_use]
    pub fn new(start: Config, end: Config) -> Self {
        let length = (&end - &start).norm();
        Self { start, end, length }
    }

    /// Get the start configuration.
    #[must_use]
    pub fn start(&self) -> &Config {
        &self.start
    }

    /// Get the end configuration.
    #[must_use]
    pub fn end(&self) -> &Config {
        &self.end
    }

    /// Get the arc length of the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Evaluate the configuration at arc length `s`.
    ///
    /// `s` is clamped to `[0, length]`, so querying slightly past either end
    /// saturates at the endpoint.
    #[must_use]
    pub fn config_at(&self, s: f64) -> Config {
        if self.length <= 0.0 {
            return self.start.clone();
        }
        let u = (s / self.length).clamp(0.0, 1.0);
        &self.start * (1.0 - u) + &self.end * u
    }

    /// Unit tangent of the segment (constant along its length).
    #[must_use]
    pub fn tangent_at(&self, _s: f64) -> Config {
        if self.length <= 0.0 {
            return Config::zeros(self.start.len());
        }
        (&self.end - &self.start) / self.length
    }

    /// Curvature vector (always zero for a straight segment).
    #[must_use]
    pub fn curvature_at(&self, _s: f64) -> Config {
        Config::zeros(self.start.len())
    }

    /// Arc lengths where a coordinate of the tangent direction peaks.
    ///
    /// Always empty: the tangent is constant.
    #[must_use]
    pub fn switching_points(&self) -> Vec<f64> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::dvector;

    #[test]
    fn test_endpoints() {
        let segment = LinearSegment::new(dvector![1.0, 2.0], dvector![4.0, 6.0]);

        assert_relative_eq!(segment.length(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(segment.config_at(0.0), dvector![1.0, 2.0], epsilon = 1e-12);
        assert_relative_eq!(segment.config_at(5.0), dvector![4.0, 6.0], epsilon = 1e-12);
    }

    #[test]
    fn test_query_saturates_past_ends() {
        let segment = LinearSegment::new(dvector![0.0, 0.0], dvector![2.0, 0.0]);

        assert_relative_eq!(segment.config_at(-1.0), dvector![0.0, 0.0], epsilon = 1e-12);
        assert_relative_eq!(segment.config_at(10.0), dvector![2.0, 0.0], epsilon = 1e-12);
    }

    #[test]
    fn test_tangent_is_unit() {
        let segment = LinearSegment::new(dvector![0.0, 0.0, 0.0], dvector![1.0, 1.0, 1.0]);

        let tangent = segment.tangent_at(0.3);
        assert_relative_eq!(tangent.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(tangent, segment.tangent_at(1.2), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_curvature() {
        let segment = LinearSegment::new(dvector![0.0, 0.0], dvector![1.0, 0.0]);

        assert_relative_eq!(segment.curvature_at(0.5).norm(), 0.0, epsilon = 1e-12);
        assert!(segment.switching_points().is_empty());
    }

    #[test]
    fn test_degenerate_segment() {
        let segment = LinearSegment::new(dvector![1.0, 1.0], dvector![1.0, 1.0]);

        assert_relative_eq!(segment.length(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(segment.config_at(0.0), dvector![1.0, 1.0], epsilon = 1e-12);
        assert_relative_eq!(segment.tangent_at(0.0).norm(), 0.0, epsilon = 1e-12);
    }
}
