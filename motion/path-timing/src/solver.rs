//! Phase-plane solver.
//!
//! Time-optimal path following reduces to a scalar problem in the phase
//! plane of (path position, path velocity): integrate forward at the
//! maximum feasible path acceleration, backward at the minimum, and stitch
//! the arcs together at switching points where the active constraint
//! changes. Two limit curves bound the feasible region:
//!
//! - the **velocity limit curve**, the largest path velocity compatible
//!   with the per-axis velocity bounds at a given arc length;
//! - the **acceleration limit curve**, the largest path velocity at which
//!   some feasible path acceleration still exists under the per-axis
//!   acceleration bounds.
//!
//! The construction follows Kunz & Stilman, "Time-Optimal Trajectory
//! Generation for Path Following with Bounded Acceleration and Velocity".

use crate::{KinematicLimits, PhasePoint, ProfileStep, TrajectoryError};
use path_types::Path;
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Comparison and bracketing tolerance for the phase-plane searches.
const EPS: f64 = 1e-6;

/// Coarse scan step for locating velocity-curve switching points.
const VELOCITY_SEARCH_STEP: f64 = 1e-3;

/// Bracket width at which the velocity-curve bisection stops.
const VELOCITY_SEARCH_ACCURACY: f64 = 1e-6;

/// Tuning knobs for trajectory generation.
///
/// # Example
///
/// ```
/// use path_timing::SolverOptions;
///
/// let options = SolverOptions::new().with_time_step(1e-4);
/// assert!((options.time_step() - 1e-4).abs() < 1e-18);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverOptions {
    /// Integration time step in seconds.
    time_step: f64,
}

impl SolverOptions {
    /// Create options with the default time step of 1 ms.
    #[must_use]
    pub const fn new() -> Self {
        Self { time_step: 1e-3 }
    }

    /// Set the integration time step.
    ///
    /// Smaller steps track the limit curves more tightly at proportional
    /// cost. The value is validated when the trajectory is generated.
    #[must_use]
    pub const fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    /// Get the integration time step.
    #[must_use]
    pub const fn time_step(&self) -> f64 {
        self.time_step
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one forward integration run.
enum ForwardOutcome {
    /// The integration advanced past the end of the path.
    EndReached,
    /// The integration ran into a limit curve or a mandatory stop; a
    /// switching point must be found before continuing.
    LimitHit,
}

/// A switching point candidate in the phase plane, with the extreme path
/// accelerations to use just before (deceleration) and after
/// (acceleration) it.
struct SwitchingCandidate {
    path_pos: f64,
    path_vel: f64,
    before_accel: f64,
    after_accel: f64,
}

/// The phase-plane solver: borrows the path and limits for the duration of
/// one construction.
pub(crate) struct Solver<'a> {
    path: &'a Path,
    limits: &'a KinematicLimits,
    time_step: f64,
    dim: usize,
}

impl<'a> Solver<'a> {
    pub(crate) fn new(path: &'a Path, limits: &'a KinematicLimits, time_step: f64) -> Self {
        Self {
            path,
            limits,
            time_step,
            dim: limits.dim(),
        }
    }

    /// Run the full construction: alternate forward and backward passes
    /// until the forward pass reaches the path end, decelerate to rest at
    /// the end, then time the profile.
    pub(crate) fn solve(&self) -> Result<Vec<ProfileStep>, TrajectoryError> {
        let mut profile = vec![PhasePoint::new(0.0, 0.0)];
        let mut acceleration = self.acceleration_extremum(0.0, 0.0, 1.0);

        loop {
            match self.integrate_forward(&mut profile, acceleration)? {
                ForwardOutcome::EndReached => break,
                ForwardOutcome::LimitHit => {
                    let last_pos = profile[profile.len() - 1].path_pos;
                    let Some(candidate) = self.next_switching_point(last_pos) else {
                        break;
                    };
                    debug!(
                        path_pos = candidate.path_pos,
                        path_vel = candidate.path_vel,
                        "integrating backward from switching point"
                    );
                    self.integrate_backward(
                        &mut profile,
                        candidate.path_pos,
                        candidate.path_vel,
                        candidate.before_accel,
                    )?;
                    acceleration = candidate.after_accel;
                }
            }
        }

        let length = self.path.length();
        let final_deceleration = self.acceleration_extremum(length, 0.0, -1.0);
        self.integrate_backward(&mut profile, length, 0.0, final_deceleration)?;

        debug!(steps = profile.len(), "phase-plane profile complete");
        Ok(assign_times(&profile))
    }

    // --- limit curves -----------------------------------------------------

    /// Extreme feasible path acceleration at `(s, v)`: the maximum for
    /// `factor = 1`, the minimum (most negative) for `factor = -1`.
    fn acceleration_extremum(&self, s: f64, v: f64, factor: f64) -> f64 {
        let tangent = self.path.tangent_at(s);
        let curvature = self.path.curvature_at(s);
        let mut bound = f64::MAX;
        for i in 0..self.dim {
            if tangent[i] != 0.0 {
                bound = bound.min(
                    self.limits.max_acceleration()[i] / tangent[i].abs()
                        - factor * curvature[i] * v * v / tangent[i],
                );
            }
        }
        factor * bound
    }

    /// Slope of an extreme phase-plane arc through `(s, v)`.
    fn phase_slope(&self, s: f64, v: f64, factor: f64) -> f64 {
        self.acceleration_extremum(s, v, factor) / v
    }

    /// Velocity limit curve: the largest path velocity the per-axis
    /// velocity bounds allow at `s`.
    pub(crate) fn velocity_limit(&self, s: f64) -> f64 {
        let tangent = self.path.tangent_at(s);
        let mut limit = f64::MAX;
        for i in 0..self.dim {
            limit = limit.min(self.limits.max_velocity()[i] / tangent[i].abs());
        }
        limit
    }

    /// Closed-form derivative of the velocity limit curve, taken along the
    /// axis that attains the limit.
    fn velocity_limit_slope(&self, s: f64) -> f64 {
        let tangent = self.path.tangent_at(s);
        let mut limit = f64::MAX;
        let mut active = 0;
        for i in 0..self.dim {
            let candidate = self.limits.max_velocity()[i] / tangent[i].abs();
            if candidate < limit {
                limit = candidate;
                active = i;
            }
        }
        -(self.limits.max_velocity()[active] * self.path.curvature_at(s)[active])
            / (tangent[active] * tangent[active].abs())
    }

    /// Acceleration limit curve: the largest path velocity at which a
    /// feasible path acceleration still exists at `s`.
    pub(crate) fn acceleration_limit(&self, s: f64) -> f64 {
        let tangent = self.path.tangent_at(s);
        let curvature = self.path.curvature_at(s);
        let max_acceleration = self.limits.max_acceleration();
        let mut limit = f64::INFINITY;
        for i in 0..self.dim {
            if tangent[i] != 0.0 {
                for j in (i + 1)..self.dim {
                    if tangent[j] != 0.0 {
                        // Curvature coupling between axes i and j: where it
                        // is non-zero, the two axes can saturate with
                        // opposite signs and cap the velocity.
                        let coupling = curvature[i] / tangent[i] - curvature[j] / tangent[j];
                        if coupling != 0.0 {
                            limit = limit.min(
                                ((max_acceleration[i] / tangent[i].abs()
                                    + max_acceleration[j] / tangent[j].abs())
                                    / coupling.abs())
                                .sqrt(),
                            );
                        }
                    }
                }
            } else if curvature[i] != 0.0 {
                // The path does not move along axis i, so the whole
                // centripetal term must fit within that axis' bound.
                limit = limit.min((max_acceleration[i] / curvature[i].abs()).sqrt());
            }
        }
        limit
    }

    /// Central-difference derivative of the acceleration limit curve.
    ///
    /// Noisy near corner geometry (the curve itself is only piecewise
    /// smooth); the switching-point acceptance tests are written against
    /// this estimate and tolerate the noise.
    fn acceleration_limit_slope(&self, s: f64) -> f64 {
        (self.acceleration_limit(s + EPS) - self.acceleration_limit(s - EPS)) / (2.0 * EPS)
    }

    /// Magnitude of the tangent jump across a segment boundary at `s`.
    ///
    /// Evaluates the neighbouring segments exactly at their shared end, so
    /// a C¹ blend join measures as zero regardless of blend radius.
    fn tangent_jump(&self, s: f64) -> f64 {
        let Some((before, _)) = self.path.segment_at(s - EPS) else {
            return 0.0;
        };
        let Some((after, _)) = self.path.segment_at(s + EPS) else {
            return 0.0;
        };
        (after.tangent_at(0.0) - before.tangent_at(before.length())).norm()
    }

    // --- forward pass -----------------------------------------------------

    /// Integrate forward at maximum path acceleration from the profile
    /// tail, appending steps until the path end is passed or a limit curve
    /// is overrun.
    fn integrate_forward(
        &self,
        profile: &mut Vec<PhasePoint>,
        mut acceleration: f64,
    ) -> Result<ForwardOutcome, TrajectoryError> {
        let tail = profile[profile.len() - 1];
        let mut path_pos = tail.path_pos;
        let mut path_vel = tail.path_vel;
        let switching_points = self.path.switching_points();

        loop {
            let next_discontinuity = switching_points
                .iter()
                .find(|point| point.discontinuous && point.position > path_pos);

            let old_pos = path_pos;
            let old_vel = path_vel;
            path_vel += self.time_step * acceleration;
            path_pos += self.time_step * 0.5 * (old_vel + path_vel);

            // Never integrate across a discontinuity: land exactly on it.
            if let Some(discontinuity) = next_discontinuity {
                if path_pos > discontinuity.position {
                    path_vel = old_vel
                        + (discontinuity.position - old_pos) * (path_vel - old_vel)
                            / (path_pos - old_pos);
                    path_pos = discontinuity.position;

                    // A tangent discontinuity (sharp corner) cannot be
                    // crossed at speed; hand over to the switching-point
                    // search, which will bring the profile to rest there.
                    if path_vel > 0.0 && self.tangent_jump(path_pos) > EPS {
                        debug!(path_pos, "stopping forward pass at sharp corner");
                        return Ok(ForwardOutcome::LimitHit);
                    }
                }
            }

            if path_pos > self.path.length() {
                profile.push(PhasePoint::new(path_pos, path_vel));
                return Ok(ForwardOutcome::EndReached);
            }
            if path_vel < 0.0 {
                warn!(path_pos, "forward integration produced negative velocity");
                return Err(TrajectoryError::NegativeVelocity {
                    path_pos,
                    tail: Vec::new(),
                });
            }

            // Ride along the velocity limit curve while it is reachable.
            if path_vel > self.velocity_limit(path_pos)
                && self.phase_slope(old_pos, self.velocity_limit(old_pos), -1.0)
                    <= self.velocity_limit_slope(old_pos)
            {
                path_vel = self.velocity_limit(path_pos);
            }

            profile.push(PhasePoint::new(path_pos, path_vel));
            acceleration = self.acceleration_extremum(path_pos, path_vel, 1.0);

            if path_vel > self.acceleration_limit(path_pos)
                || path_vel > self.velocity_limit(path_pos)
            {
                // Overshot a limit curve: bisect back to the crossing and
                // decide whether a switching point is needed.
                let overshoot = profile[profile.len() - 1];
                profile.pop();
                let tail = profile[profile.len() - 1];

                let mut before = tail.path_pos;
                let mut before_vel = tail.path_vel;
                let mut after = overshoot.path_pos;
                let mut after_vel = overshoot.path_vel;
                while after - before > EPS {
                    let midpoint = 0.5 * (before + after);
                    let mut midpoint_vel = 0.5 * (before_vel + after_vel);

                    if midpoint_vel > self.velocity_limit(midpoint)
                        && self.phase_slope(before, self.velocity_limit(before), -1.0)
                            <= self.velocity_limit_slope(before)
                    {
                        midpoint_vel = self.velocity_limit(midpoint);
                    }

                    if midpoint_vel > self.acceleration_limit(midpoint)
                        || midpoint_vel > self.velocity_limit(midpoint)
                    {
                        after = midpoint;
                        after_vel = midpoint_vel;
                    } else {
                        before = midpoint;
                        before_vel = midpoint_vel;
                    }
                }
                if before > tail.path_pos {
                    profile.push(PhasePoint::new(before, before_vel));
                }

                let last = profile[profile.len() - 1];
                if self.acceleration_limit(after) < self.velocity_limit(after) {
                    if next_discontinuity.is_some_and(|d| after > d.position) {
                        return Ok(ForwardOutcome::LimitHit);
                    }
                    if self.phase_slope(last.path_pos, last.path_vel, 1.0)
                        > self.acceleration_limit_slope(last.path_pos)
                    {
                        return Ok(ForwardOutcome::LimitHit);
                    }
                } else if self.phase_slope(last.path_pos, last.path_vel, -1.0)
                    > self.velocity_limit_slope(last.path_pos)
                {
                    return Ok(ForwardOutcome::LimitHit);
                }
                // Otherwise the touch was tangential: keep integrating from
                // the overshoot state, with the profile tail on the curve.
            }
        }
    }

    // --- backward pass ----------------------------------------------------

    /// Integrate backward at minimum path acceleration from `(path_pos,
    /// path_vel)` until the arc intersects the forward profile, then splice
    /// the arc in place of the profile tail beyond the intersection.
    fn integrate_backward(
        &self,
        profile: &mut Vec<PhasePoint>,
        mut path_pos: f64,
        mut path_vel: f64,
        mut acceleration: f64,
    ) -> Result<(), TrajectoryError> {
        let start_pos = path_pos;
        if profile.len() < 2 {
            // A switching point at the very start of the path leaves no
            // forward profile to rejoin.
            return Err(TrajectoryError::NoIntersection {
                path_pos: start_pos,
                tail: Vec::new(),
            });
        }
        // Window [index - 1, index] slides backward over the forward
        // profile while the arc is built.
        let mut index = profile.len() - 1;
        debug_assert!(profile[index - 1].path_pos <= path_pos);

        // The backward arc, newest (smallest arc length) last.
        let mut arc: Vec<PhasePoint> = Vec::new();
        let mut slope = 0.0;

        while index > 1 || path_pos >= 0.0 {
            if profile[index - 1].path_pos <= path_pos {
                arc.push(PhasePoint::new(path_pos, path_vel));
                path_vel -= self.time_step * acceleration;
                path_pos -= self.time_step * 0.5 * (path_vel + arc[arc.len() - 1].path_vel);
                acceleration = self.acceleration_extremum(path_pos, path_vel, -1.0);
                slope = (arc[arc.len() - 1].path_vel - path_vel)
                    / (arc[arc.len() - 1].path_pos - path_pos);

                if path_vel < 0.0 {
                    warn!(
                        path_pos,
                        "backward integration produced negative velocity"
                    );
                    arc.reverse();
                    return Err(TrajectoryError::NegativeVelocity {
                        path_pos,
                        tail: arc,
                    });
                }
            } else {
                index -= 1;
            }

            // Intersect the newest arc chord with the profile window.
            let window_start = profile[index - 1];
            let window_end = profile[index];
            let front = arc[arc.len() - 1];
            let window_slope = (window_end.path_vel - window_start.path_vel)
                / (window_end.path_pos - window_start.path_pos);
            let intersection_pos = (window_start.path_vel - path_vel + slope * path_pos
                - window_slope * window_start.path_pos)
                / (slope - window_slope);

            if window_start.path_pos.max(path_pos) - EPS <= intersection_pos
                && intersection_pos <= EPS + window_end.path_pos.min(front.path_pos)
            {
                let intersection_vel =
                    window_start.path_vel + window_slope * (intersection_pos - window_start.path_pos);
                profile.truncate(index);
                profile.push(PhasePoint::new(intersection_pos, intersection_vel));
                profile.extend(arc.iter().rev());
                return Ok(());
            }
        }

        warn!(
            start_pos,
            "backward integration reached the path start without rejoining"
        );
        arc.reverse();
        Err(TrajectoryError::NoIntersection {
            path_pos: start_pos,
            tail: arc,
        })
    }

    // --- switching point discovery ----------------------------------------

    /// Find the next switching point after `s` to restart integration from:
    /// the earlier of the next acceleration-curve candidate and the next
    /// velocity-curve candidate, each filtered against the other limit
    /// curve.
    fn next_switching_point(&self, s: f64) -> Option<SwitchingCandidate> {
        // Acceleration candidates are only valid below the velocity limit
        // curve.
        let mut accel_cursor = s;
        let mut accel_candidate = None;
        while let Some(candidate) = self.next_acceleration_switching_point(accel_cursor) {
            accel_cursor = candidate.path_pos;
            if candidate.path_vel <= self.velocity_limit(candidate.path_pos) {
                accel_candidate = Some(candidate);
                break;
            }
        }

        // Velocity candidates before the acceleration candidate must lie
        // below the acceleration limit curve on both sides.
        let mut velocity_cursor = s;
        let mut velocity_candidate = None;
        while let Some(candidate) = self.next_velocity_switching_point(velocity_cursor) {
            velocity_cursor = candidate.path_pos;
            let keep_searching = candidate.path_pos <= accel_cursor
                && (candidate.path_vel > self.acceleration_limit(candidate.path_pos - EPS)
                    || candidate.path_vel > self.acceleration_limit(candidate.path_pos + EPS));
            if !keep_searching {
                velocity_candidate = Some(candidate);
                break;
            }
        }

        match (accel_candidate, velocity_candidate) {
            (None, None) => None,
            (Some(accel), None) => Some(accel),
            (None, Some(velocity)) => Some(velocity),
            (Some(accel), Some(velocity)) => {
                if accel.path_pos <= velocity.path_pos {
                    Some(accel)
                } else {
                    Some(velocity)
                }
            }
        }
    }

    /// Scan the path's switching-point catalogue for the next acceleration
    /// switching point after `s`.
    fn next_acceleration_switching_point(&self, s: f64) -> Option<SwitchingCandidate> {
        let mut position = s;
        loop {
            let point = self.path.next_switching_point(position);
            if point.position > self.path.length() - EPS {
                return None;
            }
            position = point.position;

            if point.discontinuous {
                // A sharp corner is a mandatory stop: the only feasible
                // crossing velocity is zero.
                if self.tangent_jump(position) > EPS {
                    return Some(SwitchingCandidate {
                        path_pos: position,
                        path_vel: 0.0,
                        before_accel: self.acceleration_extremum(position - EPS, 0.0, -1.0),
                        after_accel: self.acceleration_extremum(position + EPS, 0.0, 1.0),
                    });
                }

                let before_vel = self.acceleration_limit(position - EPS);
                let after_vel = self.acceleration_limit(position + EPS);
                let path_vel = before_vel.min(after_vel);

                // The curve must be entered from above on one side and left
                // from above on the other for the jump to be a genuine
                // switching point.
                if (before_vel > after_vel
                    || self.phase_slope(position - EPS, path_vel, -1.0)
                        > self.acceleration_limit_slope(position - 2.0 * EPS))
                    && (before_vel < after_vel
                        || self.phase_slope(position + EPS, path_vel, 1.0)
                            < self.acceleration_limit_slope(position + 2.0 * EPS))
                {
                    return Some(SwitchingCandidate {
                        path_pos: position,
                        path_vel,
                        before_accel: self.acceleration_extremum(position - EPS, path_vel, -1.0),
                        after_accel: self.acceleration_extremum(position + EPS, path_vel, 1.0),
                    });
                }
            } else if self.acceleration_limit_slope(position - EPS) < 0.0
                && self.acceleration_limit_slope(position + EPS) > 0.0
            {
                // Local minimum of the acceleration limit curve.
                return Some(SwitchingCandidate {
                    path_pos: position,
                    path_vel: self.acceleration_limit(position),
                    before_accel: 0.0,
                    after_accel: 0.0,
                });
            }
        }
    }

    /// Search the velocity limit curve for the next point after `s` where a
    /// maximal deceleration arc stops escaping the curve: a coarse scan
    /// brackets the sign change, then bisection refines it.
    fn next_velocity_switching_point(&self, s: f64) -> Option<SwitchingCandidate> {
        let mut position = s - VELOCITY_SEARCH_STEP;
        let mut bracketed = false;
        loop {
            position += VELOCITY_SEARCH_STEP;
            let escape_slope = self.phase_slope(position, self.velocity_limit(position), -1.0);
            let curve_slope = self.velocity_limit_slope(position);
            if escape_slope >= curve_slope {
                bracketed = true;
            }
            if position >= self.path.length() {
                return None;
            }
            if bracketed && escape_slope <= curve_slope {
                break;
            }
        }

        let mut before = position - VELOCITY_SEARCH_STEP;
        let mut after = position;
        while after - before > VELOCITY_SEARCH_ACCURACY {
            let midpoint = 0.5 * (before + after);
            if self.phase_slope(midpoint, self.velocity_limit(midpoint), -1.0)
                > self.velocity_limit_slope(midpoint)
            {
                before = midpoint;
            } else {
                after = midpoint;
            }
        }

        Some(SwitchingCandidate {
            path_pos: after,
            path_vel: self.velocity_limit(after),
            before_accel: self.acceleration_extremum(before, self.velocity_limit(before), -1.0),
            after_accel: self.acceleration_extremum(after, self.velocity_limit(after), 1.0),
        })
    }
}

/// Time the phase profile with the trapezoidal rule; non-advancing steps
/// are dropped so times stay strictly increasing.
fn assign_times(profile: &[PhasePoint]) -> Vec<ProfileStep> {
    let mut steps: Vec<ProfileStep> = Vec::with_capacity(profile.len());
    steps.push(ProfileStep::new(profile[0].path_pos, profile[0].path_vel, 0.0));
    for point in &profile[1..] {
        let previous = steps[steps.len() - 1];
        if point.path_pos <= previous.path_pos {
            continue;
        }
        let time = previous.time
            + (point.path_pos - previous.path_pos)
                / (0.5 * (point.path_vel + previous.path_vel));
        steps.push(ProfileStep::new(point.path_pos, point.path_vel, time));
    }
    steps
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::dvector;
    use path_types::Path;

    fn unit_limits(dim: usize) -> KinematicLimits {
        KinematicLimits::uniform(dim, 1.0, 1.0).unwrap()
    }

    fn line_path() -> Path {
        Path::new(&[dvector![0.0, 0.0, 0.0], dvector![1.0, 0.0, 0.0]], 0.0).unwrap()
    }

    #[test]
    fn test_acceleration_extremum_on_line() {
        let path = line_path();
        let limits = unit_limits(3);
        let solver = Solver::new(&path, &limits, 1e-3);

        // Straight x-axis segment: the bound is the axis bound itself.
        assert_relative_eq!(solver.acceleration_extremum(0.5, 0.3, 1.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            solver.acceleration_extremum(0.5, 0.3, -1.0),
            -1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_velocity_limit_on_line() {
        let path = line_path();
        let limits = unit_limits(3);
        let solver = Solver::new(&path, &limits, 1e-3);

        assert_relative_eq!(solver.velocity_limit(0.5), 1.0, epsilon = 1e-12);
        // Flat curve
        assert_relative_eq!(solver.velocity_limit_slope(0.5), 0.0, epsilon = 1e-12);
        // No curvature anywhere: no acceleration limit
        assert!(solver.acceleration_limit(0.5).is_infinite());
    }

    #[test]
    fn test_limits_dip_inside_blend() {
        let path = Path::new(
            &[
                dvector![0.0, 0.0, 0.0],
                dvector![1.0, 0.0, 0.0],
                dvector![1.0, 1.0, 0.0],
            ],
            0.1,
        )
        .unwrap();
        let limits = unit_limits(3);
        let solver = Solver::new(&path, &limits, 1e-3);

        // Mid-blend arc length
        let blend_mid = path.segments()[0].length() + 0.5 * path.segments()[1].length();
        let on_line = solver.acceleration_limit(0.1);
        let in_blend = solver.acceleration_limit(blend_mid);
        assert!(on_line.is_infinite());
        assert!(in_blend.is_finite());
        // sqrt(2 * a_max * r) for the 45-degree arc midpoint
        let radius = 0.1 * (std::f64::consts::FRAC_PI_4).sin()
            / (1.0 - (std::f64::consts::FRAC_PI_4).cos());
        assert!(in_blend < (2.0_f64 * radius).sqrt() + 0.1);
    }

    #[test]
    fn test_tangent_jump_detection() {
        let sharp = Path::new(
            &[
                dvector![0.0, 0.0, 0.0],
                dvector![1.0, 0.0, 0.0],
                dvector![1.0, 1.0, 0.0],
            ],
            0.0,
        )
        .unwrap();
        let limits = unit_limits(3);
        let solver = Solver::new(&sharp, &limits, 1e-3);
        // Right-angle corner: the jump has norm sqrt(2)
        assert!(solver.tangent_jump(1.0) > 1.0);

        let blended = Path::new(
            &[
                dvector![0.0, 0.0, 0.0],
                dvector![1.0, 0.0, 0.0],
                dvector![1.0, 1.0, 0.0],
            ],
            0.001,
        )
        .unwrap();
        let solver = Solver::new(&blended, &limits, 1e-3);
        for point in blended.switching_points() {
            if point.discontinuous {
                assert!(solver.tangent_jump(point.position) < 1e-9);
            }
        }
    }

    #[test]
    fn test_assign_times_trapezoidal() {
        let profile = vec![
            PhasePoint::new(0.0, 0.0),
            PhasePoint::new(0.5, 1.0),
            PhasePoint::new(1.0, 0.0),
        ];
        let steps = assign_times(&profile);

        assert_eq!(steps.len(), 3);
        assert_relative_eq!(steps[0].time, 0.0, epsilon = 1e-12);
        // 0.5 distance at average velocity 0.5
        assert_relative_eq!(steps[1].time, 1.0, epsilon = 1e-12);
        assert_relative_eq!(steps[2].time, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_assign_times_drops_stalled_steps() {
        let profile = vec![
            PhasePoint::new(0.0, 0.0),
            PhasePoint::new(0.5, 1.0),
            PhasePoint::new(0.5, 1.0),
            PhasePoint::new(1.0, 0.0),
        ];
        let steps = assign_times(&profile);

        assert_eq!(steps.len(), 3);
        for pair in steps.windows(2) {
            assert!(pair[0].time < pair[1].time);
        }
    }

    #[test]
    fn test_forward_integration_reaches_end_of_line() {
        let path = line_path();
        let limits = unit_limits(3);
        let solver = Solver::new(&path, &limits, 1e-3);

        let mut profile = vec![PhasePoint::new(0.0, 0.0)];
        let accel = solver.acceleration_extremum(0.0, 0.0, 1.0);
        let outcome = solver.integrate_forward(&mut profile, accel).unwrap();

        assert!(matches!(outcome, ForwardOutcome::EndReached));
        let last = profile[profile.len() - 1];
        assert!(last.path_pos > path.length());
        // Velocity is capped at the axis bound throughout
        for point in &profile {
            assert!(point.path_vel <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn test_backward_integration_splices_deceleration() {
        let path = line_path();
        let limits = unit_limits(3);
        let solver = Solver::new(&path, &limits, 1e-3);

        let mut profile = vec![PhasePoint::new(0.0, 0.0)];
        let accel = solver.acceleration_extremum(0.0, 0.0, 1.0);
        solver.integrate_forward(&mut profile, accel).unwrap();

        let deceleration = solver.acceleration_extremum(path.length(), 0.0, -1.0);
        solver
            .integrate_backward(&mut profile, path.length(), 0.0, deceleration)
            .unwrap();

        // Profile now ends at rest at the path end
        let last = profile[profile.len() - 1];
        assert_relative_eq!(last.path_pos, path.length(), epsilon = 1e-9);
        assert_relative_eq!(last.path_vel, 0.0, epsilon = 1e-9);
        // Positions are non-decreasing through the splice, up to the
        // intersection tolerance
        for pair in profile.windows(2) {
            assert!(pair[1].path_pos >= pair[0].path_pos - 2e-6);
        }
    }

    #[test]
    fn test_corner_switching_point_is_stop() {
        let path = Path::new(
            &[
                dvector![0.0, 0.0, 0.0],
                dvector![1.0, 0.0, 0.0],
                dvector![1.0, 1.0, 0.0],
            ],
            0.0,
        )
        .unwrap();
        let limits = unit_limits(3);
        let solver = Solver::new(&path, &limits, 1e-3);

        let candidate = solver.next_switching_point(0.0).unwrap();
        assert_relative_eq!(candidate.path_pos, 1.0, epsilon = 1e-9);
        assert_relative_eq!(candidate.path_vel, 0.0, epsilon = 1e-12);
        assert!(candidate.before_accel < 0.0);
        assert!(candidate.after_accel > 0.0);
    }

    #[test]
    fn test_no_switching_point_on_plain_line() {
        let path = line_path();
        let limits = unit_limits(3);
        let solver = Solver::new(&path, &limits, 1e-3);

        assert!(solver.next_switching_point(0.0).is_none());
    }
}
