//! Arc-length parameterised paths through waypoints.

use crate::{CircularBlend, Config, LinearSegment, PathError, PathSegment, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimum gap between consecutive configurations before a connecting
/// straight segment is emitted.
const GAP_TOLERANCE: f64 = 1e-6;

/// An arc length at which the active kinematic constraint can change.
///
/// Continuous points come from per-axis tangent extrema inside circular
/// blends; discontinuous points mark segment boundaries, where curvature
/// (and, for unblended corners, the tangent) jumps.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SwitchingPoint {
    /// Absolute arc length of the point.
    pub position: f64,
    /// Whether path derivatives are discontinuous across the point.
    pub discontinuous: bool,
}

/// A piecewise path through waypoints, parameterised by arc length.
///
/// The path linearly connects the waypoints and, when a positive blend
/// deviation is given, rounds each interior corner with a [`CircularBlend`]
/// sized to stay within that deviation. The result is C¹-continuous wherever
/// corners are blended, and every geometric query is a function of the
/// absolute arc length `s ∈ [0, length]`.
///
/// # Example
///
/// ```
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
///
/// // Shorter than the 2.0 polyline: the blend cuts the corner
/// assert!(path.length() < 2.0);
/// assert!(path.length() > 1.8);
///
/// // Start and end are the first and last waypoints
/// let start = path.config_at(0.0);
/// let end = path.config_at(path.length());
/// assert!((start - dvector![0.0, 0.0, 0.0]).norm() < 1e-12);
/// assert!((end - dvector![1.0, 1.0, 0.0]).norm() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Path {
    /// Segments in path order.
    segments: Vec<PathSegment>,
    /// Cumulative start offset of each segment.
    offsets: Vec<f64>,
    /// Total arc length.
    length: f64,
    /// Configuration-space dimension.
    dim: usize,
    /// Switching points in strictly increasing arc-length order.
    switching_points: Vec<SwitchingPoint>,
}

impl Path {
    /// Build a path through `waypoints` with the given blend deviation.
    ///
    /// With `max_deviation = 0` the path is the exact polyline and every
    /// interior waypoint is a sharp corner. With a positive deviation each
    /// interior corner is blended; the blend endpoints never reach past the
    /// midpoints of the adjacent edges.
    ///
    /// Fewer than two waypoints produce an empty path of length zero.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::DimensionMismatch`] if the waypoints differ in
    /// dimension and [`PathError::InvalidDeviation`] if `max_deviation` is
    /// negative.
    pub fn new(waypoints: &[Config], max_deviation: f64) -> Result<Self> {
        if max_deviation < 0.0 {
            return Err(PathError::InvalidDeviation(max_deviation));
        }
        let dim = waypoints.first().map_or(0, Config::len);
        for waypoint in waypoints {
            if waypoint.len() != dim {
                return Err(PathError::dimension_mismatch(dim, waypoint.len()));
            }
        }

        let segments = build_segments(waypoints, max_deviation);
        Ok(Self::from_segments(segments, dim))
    }

    /// Assemble the path from finished segments: assign cumulative offsets
    /// and translate per-segment switching points into the absolute
    /// catalogue.
    fn from_segments(segments: Vec<PathSegment>, dim: usize) -> Self {
        let mut offsets = Vec::with_capacity(segments.len());
        let mut switching_points: Vec<SwitchingPoint> = Vec::new();
        let mut length = 0.0;

        for segment in &segments {
            offsets.push(length);
            for local in segment.switching_points() {
                switching_points.push(SwitchingPoint {
                    position: length + local,
                    discontinuous: false,
                });
            }
            length += segment.length();

            // Points that fell on or past the boundary are superseded by the
            // boundary marker itself.
            while switching_points
                .last()
                .is_some_and(|point| point.position >= length)
            {
                switching_points.pop();
            }
            switching_points.push(SwitchingPoint {
                position: length,
                discontinuous: true,
            });
        }
        // The path end is not a switching point.
        switching_points.pop();

        Self {
            segments,
            offsets,
            length,
            dim,
            switching_points,
        }
    }

    /// Get the total arc length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Get the configuration-space dimension.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Check whether the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get the segments in path order.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Locate the segment containing arc length `s`.
    ///
    /// Returns the segment and the local arc length within it, or `None` for
    /// an empty path. Queries before the start map to the first segment and
    /// queries past the end to the last, with the local arc length running
    /// out of range accordingly (segment queries saturate).
    #[must_use]
    pub fn segment_at(&self, s: f64) -> Option<(&PathSegment, f64)> {
        if self.segments.is_empty() {
            return None;
        }
        // First segment whose offset exceeds s, minus one; ties resolve to
        // the last zero-length segment at that offset.
        let index = self
            .offsets
            .partition_point(|&offset| offset <= s)
            .saturating_sub(1);
        Some((&self.segments[index], s - self.offsets[index]))
    }

    /// Evaluate the configuration at arc length `s`.
    ///
    /// # Panics
    ///
    /// Panics if the path is empty.
    #[must_use]
    pub fn config_at(&self, s: f64) -> Config {
        let Some((segment, local)) = self.segment_at(s) else {
            panic!("configuration query on an empty path");
        };
        segment.config_at(local)
    }

    /// Unit tangent at arc length `s`.
    ///
    /// # Panics
    ///
    /// Panics if the path is empty.
    #[must_use]
    pub fn tangent_at(&self, s: f64) -> Config {
        let Some((segment, local)) = self.segment_at(s) else {
            panic!("tangent query on an empty path");
        };
        segment.tangent_at(local)
    }

    /// Curvature vector at arc length `s`.
    ///
    /// # Panics
    ///
    /// Panics if the path is empty.
    #[must_use]
    pub fn curvature_at(&self, s: f64) -> Config {
        let Some((segment, local)) = self.segment_at(s) else {
            panic!("curvature query on an empty path");
        };
        segment.curvature_at(local)
    }

    /// Get the first switching point strictly after arc length `s`.
    ///
    /// Past the last catalogue entry this returns the path end, marked
    /// discontinuous.
    #[must_use]
    pub fn next_switching_point(&self, s: f64) -> SwitchingPoint {
        self.switching_points
            .iter()
            .find(|point| point.position > s)
            .copied()
            .unwrap_or(SwitchingPoint {
                position: self.length,
                discontinuous: true,
            })
    }

    /// Get the full switching-point catalogue, in increasing arc-length
    /// order.
    #[must_use]
    pub fn switching_points(&self) -> &[SwitchingPoint] {
        &self.switching_points
    }
}

/// Walk the waypoints, emitting connector segments and corner blends.
fn build_segments(waypoints: &[Config], max_deviation: f64) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    if waypoints.len() < 2 {
        return segments;
    }

    let mut start_config = waypoints[0].clone();
    for i in 1..waypoints.len() {
        if max_deviation > 0.0 && i + 1 < waypoints.len() {
            // Blend the corner at waypoint i, anchored at the midpoints of
            // the two adjacent edges.
            let blend = CircularBlend::from_corner(
                &((&waypoints[i - 1] + &waypoints[i]) * 0.5),
                &waypoints[i],
                &((&waypoints[i] + &waypoints[i + 1]) * 0.5),
                max_deviation,
            );
            let entry = blend.config_at(0.0);
            let exit = blend.config_at(blend.length());
            if (&entry - &start_config).norm() > GAP_TOLERANCE {
                segments.push(PathSegment::Linear(LinearSegment::new(
                    start_config,
                    entry,
                )));
            }
            segments.push(PathSegment::Circular(blend));
            start_config = exit;
        } else {
            segments.push(PathSegment::Linear(LinearSegment::new(
                start_config,
                waypoints[i].clone(),
            )));
            start_config = waypoints[i].clone();
        }
    }
    segments
}
