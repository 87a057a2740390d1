//! Path segment sum type.

use crate::{CircularBlend, Config, LinearSegment};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single piece of a path: either a straight segment or a circular blend.
///
/// All queries take a local arc length `s ∈ [0, length]` measured from the
/// start of the segment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PathSegment {
    /// Straight line between two configurations.
    Linear(LinearSegment),
    /// Circular corner blend.
    Circular(CircularBlend),
}

impl PathSegment {
    /// Get the arc length of the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::Linear(segment) => segment.length(),
            Self::Circular(blend) => blend.length(),
        }
    }

    /// Evaluate the configuration at local arc length `s`.
    #[must_use]
    pub fn config_at(&self, s: f64) -> Config {
        match self {
            Self::Linear(segment) => segment.config_at(s),
            Self::Circular(blend) => blend.config_at(s),
        }
    }

    /// Unit tangent at local arc length `s`.
    #[must_use]
    pub fn tangent_at(&self, s: f64) -> Config {
        match self {
            Self::Linear(segment) => segment.tangent_at(s),
            Self::Circular(blend) => blend.tangent_at(s),
        }
    }

    /// Curvature vector at local arc length `s`.
    #[must_use]
    pub fn curvature_at(&self, s: f64) -> Config {
        match self {
            Self::Linear(segment) => segment.curvature_at(s),
            Self::Circular(blend) => blend.curvature_at(s),
        }
    }

    /// Local arc lengths of per-axis tangent-component zero crossings,
    /// strictly inside the segment and sorted ascending.
    #[must_use]
    pub fn switching_points(&self) -> Vec<f64> {
        match self {
            Self::Linear(segment) => segment.switching_points(),
            Self::Circular(blend) => blend.switching_points(),
        }
    }

    /// Check if this is a straight segment.
    #[must_use]
    pub fn is_linear(&self) -> bool {
        matches!(self, Self::Linear(_))
    }

    /// Check if this is a circular blend.
    #[must_use]
    pub fn is_circular(&self) -> bool {
        matches!(self, Self::Circular(_))
    }
}
