//! Arc-length parameterised waypoint paths with circular corner blends.
//!
//! This crate turns an ordered list of waypoints in an N-dimensional
//! configuration space into a piecewise geometric path:
//!
//! - [`LinearSegment`] - straight segments between configurations
//! - [`CircularBlend`] - circular arcs rounding interior corners within a
//!   caller-supplied deviation tolerance
//! - [`PathSegment`] - sum type over the two segment kinds
//! - [`Path`] - the assembled path with cumulative arc-length bookkeeping
//!   and a catalogue of [`SwitchingPoint`]s
//!
//! # Core Concepts
//!
//! **Arc length** is the single parameter of every geometric query: a path
//! of total length `L` answers `config_at(s)`, `tangent_at(s)` and
//! `curvature_at(s)` for `s ∈ [0, L]`. Blended corners make the path
//! C¹-continuous, so the tangent is well defined everywhere except at sharp
//! (unblended) corners.
//!
//! **Switching points** catalogue the arc lengths where a per-axis
//! kinematic constraint can change its active axis: curvature jumps at
//! segment boundaries (discontinuous) and per-axis tangent extrema inside
//! blends (continuous). Downstream motion planners consume this catalogue;
//! see the `path-timing` crate.
//!
//! # Example
//!
//! ```
//! use path_types::Path;
//! use nalgebra::dvector;
//!
//! // An L-shaped path with the corner rounded to stay within 0.1 units
//! let path = Path::new(
//!     &[
//!         dvector![0.0, 0.0, 0.0],
//!         dvector![1.0, 0.0, 0.0],
//!         dvector![1.0, 1.0, 0.0],
//!     ],
//!     0.1,
//! )
//! .unwrap();
//!
//! // Query geometry by arc length
//! let mid = path.config_at(path.length() / 2.0);
//! let tangent = path.tangent_at(path.length() / 2.0);
//! assert!((tangent.norm() - 1.0).abs() < 1e-9);
//!
//! // Blend boundaries are catalogued as curvature discontinuities
//! assert!(path.switching_points().iter().any(|p| p.discontinuous));
//! # let _ = mid;
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for all path types

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::suboptimal_flops,
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::needless_range_loop,
    clippy::cast_precision_loss
)]

mod circular;
mod error;
mod linear;
mod path;
mod segment;

pub use circular::CircularBlend;
pub use error::PathError;
pub use linear::LinearSegment;
pub use path::{Path, SwitchingPoint};
pub use segment::PathSegment;

/// Configuration-space point or direction: a real vector whose dimension is
/// fixed when the path is built.
pub type Config = nalgebra::DVector<f64>;

/// Result type for path operations.
pub type Result<T> = std::result::Result<T, PathError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod integration_tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::dvector;

    fn zigzag_waypoints() -> Vec<Config> {
        vec![
            dvector![0.0, 0.0, 0.0],
            dvector![0.0, 0.2, 1.0],
            dvector![0.0, 3.0, 0.5],
            dvector![1.1, 2.0, 0.0],
            dvector![1.0, 0.0, 0.0],
            dvector![0.0, 1.0, 0.0],
            dvector![0.0, 0.0, 1.0],
        ]
    }

    /// Every segment boundary is C0; blend joins are also C1, and exactly
    /// the boundaries carry discontinuity markers.
    #[test]
    fn test_path_closure() {
        let path = Path::new(&zigzag_waypoints(), 0.001).unwrap();

        for point in path.switching_points() {
            let before = path.config_at(point.position - 1e-10);
            let after = path.config_at(point.position + 1e-10);
            assert!(
                (after - before).norm() < 1e-9,
                "position jump at s = {}",
                point.position
            );

            if point.discontinuous {
                // All joins in a blended path are tangent-continuous:
                // compare the exact one-sided tangents at the join.
                let (leaving, _) = path.segment_at(point.position - 1e-10).unwrap();
                let tangent_before = leaving.tangent_at(leaving.length());
                let tangent_after = path.tangent_at(point.position);
                assert!((tangent_after - tangent_before).norm() < 1e-9);
            }
        }
    }

    #[test]
    fn test_switching_point_ordering() {
        let path = Path::new(&zigzag_waypoints(), 0.001).unwrap();

        let points = path.switching_points();
        assert!(!points.is_empty());
        for pair in points.windows(2) {
            assert!(pair[0].position < pair[1].position);
        }
        for point in points {
            assert!(point.position > 0.0);
            assert!(point.position < path.length());
        }
    }

    #[test]
    fn test_length_consistency() {
        let path = Path::new(&zigzag_waypoints(), 0.001).unwrap();

        let total: f64 = path.segments().iter().map(PathSegment::length).sum();
        assert_relative_eq!(path.length(), total, epsilon = 1e-12);
    }

    /// A blended path starts and ends exactly at the outer waypoints.
    #[test]
    fn test_endpoints_are_waypoints() {
        let waypoints = zigzag_waypoints();
        let path = Path::new(&waypoints, 0.001).unwrap();

        assert_relative_eq!(path.config_at(0.0), waypoints[0], epsilon = 1e-9);
        assert_relative_eq!(
            path.config_at(path.length()),
            waypoints[waypoints.len() - 1],
            epsilon = 1e-9
        );
    }

    /// Blending never lengthens the path.
    #[test]
    fn test_blend_shortens_path() {
        let waypoints = zigzag_waypoints();
        let sharp = Path::new(&waypoints, 0.0).unwrap();
        let blended = Path::new(&waypoints, 0.01).unwrap();

        assert!(blended.length() < sharp.length());
    }
}
