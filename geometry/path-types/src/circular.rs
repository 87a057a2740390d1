//! Circular corner blends.
//!
//! A blend replaces the sharp corner at an interior waypoint with a circular
//! arc that stays within a caller-supplied deviation of the corner. The arc
//! is tangent to both adjacent edges, so inserting it keeps the overall path
//! C¹-continuous.

use crate::Config;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerance below which a corner is considered degenerate (coincident
/// waypoints or collinear edges).
const DEGENERACY_TOLERANCE: f64 = 1e-6;

/// A circular arc smoothing the corner between two path edges.
///
/// The arc lives in the plane spanned by the orthonormal basis `(x, y)`
/// around `center`, starting at `center + radius * x` with initial tangent
/// `y`, and is parameterised by arc length `s ∈ [0, length]`.
///
/// A degenerate corner (edges shorter than 1e-6, or nearly collinear edges)
/// produces a zero-length blend with `x = y = 0` that evaluates to the
/// corner point itself.
///
/// # Example
///
/// ```
/// use path_types::CircularBlend;
/// use nalgebra::dvector;
///
/// // Right-angle corner at (1, 0, 0), blended with max deviation 0.1
/// let blend = CircularBlend::from_corner(
///     &dvector![0.0, 0.0, 0.0],
///     &dvector![1.0, 0.0, 0.0],
///     &dvector![1.0, 1.0, 0.0],
///     0.1,
/// );
///
/// assert!((blend.radius() - 0.24142).abs() < 1e-4);
///
/// // Entry point lies on the first edge, before the corner
/// let entry = blend.config_at(0.0);
/// assert!((entry[0] - 0.75858).abs() < 1e-4);
/// assert!(entry[1].abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CircularBlend {
    /// Centre of the arc.
    center: Config,
    /// Unit vector from the centre to the blend entry point.
    x: Config,
    /// Unit tangent at the blend entry point.
    y: Config,
    /// Arc radius.
    radius: f64,
    /// Arc length (cached).
    length: f64,
}

impl CircularBlend {
    /// Build the blend for the corner `start → intersection → end`.
    ///
    /// `start` and `end` are the far endpoints of the two edges meeting at
    /// `intersection`; the blend is sized so that it deviates from the
    /// corner by at most `max_deviation` and never reaches past either edge
    /// endpoint.
    #[must_use]
    pub fn from_corner(
        start: &Config,
        intersection: &Config,
        end: &Config,
        max_deviation: f64,
    ) -> Self {
        let in_edge = intersection - start;
        let out_edge = end - intersection;
        let in_length = in_edge.norm();
        let out_length = out_edge.norm();
        if in_length < DEGENERACY_TOLERANCE || out_length < DEGENERACY_TOLERANCE {
            return Self::degenerate(intersection);
        }

        let start_direction = in_edge / in_length;
        let end_direction = out_edge / out_length;
        if (&end_direction - &start_direction).norm() < DEGENERACY_TOLERANCE {
            return Self::degenerate(intersection);
        }

        let angle = start_direction
            .dot(&end_direction)
            .clamp(-1.0, 1.0)
            .acos();
        let half = 0.5 * angle;

        // How far back from the corner the blend may start: bounded by both
        // edge lengths and by the deviation tolerance.
        let distance = in_length
            .min(out_length)
            .min(max_deviation * half.sin() / (1.0 - half.cos()));

        let radius = distance / half.tan();
        let length = angle * radius;

        let center =
            intersection + (&end_direction - &start_direction).normalize() * (radius / half.cos());
        let x = (intersection - &start_direction * distance - &center).normalize();
        let y = start_direction;

        Self {
            center,
            x,
            y,
            radius,
            length,
        }
    }

    /// Zero-length blend standing in for a degenerate corner.
    fn degenerate(intersection: &Config) -> Self {
        let dim = intersection.len();
        Self {
            center: intersection.clone(),
            x: Config::zeros(dim),
            y: Config::zeros(dim),
            radius: 1.0,
            length: 0.0,
        }
    }

    /// Get the centre of the arc.
    #[must_use]
    pub fn center(&self) -> &Config {
        &self.center
    }

    /// Get the arc radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Get the arc length of the blend.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Check whether the blend collapsed to a point.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.length == 0.0
    }

    /// Evaluate the configuration at arc length `s`.
    #[must_use]
    pub fn config_at(&self, s: f64) -> Config {
        let angle = s / self.radius;
        &self.center + (&self.x * angle.cos() + &self.y * angle.sin()) * self.radius
    }

    /// Unit tangent at arc length `s`.
    #[must_use]
    pub fn tangent_at(&self, s: f64) -> Config {
        let angle = s / self.radius;
        &self.y * angle.cos() - &self.x * angle.sin()
    }

    /// Curvature vector at arc length `s` (points toward the centre, with
    /// magnitude `1 / radius`).
    #[must_use]
    pub fn curvature_at(&self, s: f64) -> Config {
        let angle = s / self.radius;
        (&self.x * angle.cos() + &self.y * angle.sin()) * (-1.0 / self.radius)
    }

    /// Arc lengths strictly inside the blend where some coordinate of the
    /// radial direction peaks (the per-axis tangent component crosses zero).
    ///
    /// These are continuous but kinematically relevant: a per-axis velocity
    /// or acceleration constraint can change its active axis there. Sorted
    /// ascending, exact duplicates removed.
    #[must_use]
    pub fn switching_points(&self) -> Vec<f64> {
        let mut points = Vec::new();
        if self.length <= 0.0 {
            return points;
        }
        for i in 0..self.x.len() {
            let mut angle = self.y[i].atan2(self.x[i]);
            if angle < 0.0 {
                angle += std::f64::consts::PI;
            }
            let s = angle * self.radius;
            if s > 0.0 && s < self.length {
                points.push(s);
            }
        }
        points.sort_by(f64::total_cmp);
        points.dedup();
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::dvector;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn right_angle_blend(max_deviation: f64) -> CircularBlend {
        CircularBlend::from_corner(
            &dvector![0.0, 0.0, 0.0],
            &dvector![1.0, 0.0, 0.0],
            &dvector![1.0, 1.0, 0.0],
            max_deviation,
        )
    }

    #[test]
    fn test_right_angle_geometry() {
        let blend = right_angle_blend(0.1);

        // distance = dev * sin(π/4) / (1 - cos(π/4)); radius = distance / tan(π/4)
        let expected_radius = 0.1 * FRAC_PI_4.sin() / (1.0 - FRAC_PI_4.cos());
        assert_relative_eq!(blend.radius(), expected_radius, epsilon = 1e-12);
        assert_relative_eq!(blend.length(), FRAC_PI_2 * expected_radius, epsilon = 1e-12);

        // Entry and exit are tangent points on the two edges
        let entry = blend.config_at(0.0);
        let exit = blend.config_at(blend.length());
        assert_relative_eq!(entry, dvector![1.0 - expected_radius, 0.0, 0.0], epsilon = 1e-9);
        assert_relative_eq!(exit, dvector![1.0, expected_radius, 0.0], epsilon = 1e-9);
    }

    #[test]
    fn test_tangents_match_edges() {
        let blend = right_angle_blend(0.1);

        assert_relative_eq!(
            blend.tangent_at(0.0),
            dvector![1.0, 0.0, 0.0],
            epsilon = 1e-9
        );
        assert_relative_eq!(
            blend.tangent_at(blend.length()),
            dvector![0.0, 1.0, 0.0],
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_curvature_magnitude() {
        let blend = right_angle_blend(0.1);

        let curvature = blend.curvature_at(0.5 * blend.length());
        assert_relative_eq!(curvature.norm(), 1.0 / blend.radius(), epsilon = 1e-12);
    }

    #[test]
    fn test_deviation_is_bounded() {
        let max_deviation = 0.1;
        let blend = right_angle_blend(max_deviation);

        // The blend's closest approach to the corner point
        let corner = dvector![1.0, 0.0, 0.0];
        let apex = blend.config_at(0.5 * blend.length());
        let deviation = (apex - corner).norm();
        assert!(deviation <= max_deviation + 1e-9);
        assert_relative_eq!(deviation, max_deviation, epsilon = 1e-9);
    }

    #[test]
    fn test_edge_length_limits_blend() {
        // Short edges: the blend may not reach past the edge endpoints
        let blend = CircularBlend::from_corner(
            &dvector![0.9, 0.0, 0.0],
            &dvector![1.0, 0.0, 0.0],
            &dvector![1.0, 0.1, 0.0],
            10.0,
        );

        let entry = blend.config_at(0.0);
        assert!(entry[0] >= 0.9 - 1e-9);
    }

    #[test]
    fn test_collinear_corner_degenerates() {
        let blend = CircularBlend::from_corner(
            &dvector![0.0, 0.0, 0.0],
            &dvector![1.0, 0.0, 0.0],
            &dvector![2.0, 0.0, 0.0],
            0.1,
        );

        assert!(blend.is_degenerate());
        assert_relative_eq!(blend.length(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(blend.radius(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            blend.config_at(0.0),
            dvector![1.0, 0.0, 0.0],
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_coincident_waypoints_degenerate() {
        let blend = CircularBlend::from_corner(
            &dvector![1.0, 0.0, 0.0],
            &dvector![1.0, 0.0, 0.0],
            &dvector![2.0, 0.0, 0.0],
            0.1,
        );

        assert!(blend.is_degenerate());
    }

    #[test]
    fn test_switching_points_planar_right_angle() {
        // Axis-aligned right angle: every per-axis zero crossing falls on a
        // blend boundary, so none are reported as interior points.
        let blend = right_angle_blend(0.1);
        assert!(blend.switching_points().is_empty());
    }

    #[test]
    fn test_switching_point_at_apex() {
        // Symmetric tent corner: the y coordinate peaks mid-arc.
        let blend = CircularBlend::from_corner(
            &dvector![0.0, 0.0, 0.0],
            &dvector![1.0, 1.0, 0.0],
            &dvector![2.0, 0.0, 0.0],
            0.1,
        );

        let points = blend.switching_points();
        assert_eq!(points.len(), 1);
        assert_relative_eq!(points[0], 0.5 * blend.length(), epsilon = 1e-9);
    }

    #[test]
    fn test_switching_points_sorted() {
        // Skewed 3D corner: multiple axes produce interior points.
        let blend = CircularBlend::from_corner(
            &dvector![0.0, 0.0, 0.0],
            &dvector![1.0, 0.4, 0.2],
            &dvector![1.3, -0.6, 0.9],
            0.05,
        );

        let points = blend.switching_points();
        for pair in points.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for &s in &points {
            assert!(s > 0.0 && s < blend.length());
        }
    }
}
