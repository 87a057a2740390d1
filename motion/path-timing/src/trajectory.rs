//! Timed trajectories over geometric paths.

use crate::solver::Solver;
use crate::{KinematicLimits, ProfileStep, SolverOptions, TrajectoryCursor, TrajectoryError};
use path_types::{Config, Path};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A time-optimal trajectory along a path under per-axis kinematic limits.
///
/// Generation runs the phase-plane solver once; the result is an immutable
/// piecewise-parabolic velocity profile over the path's arc length, sampled
/// by time. The trajectory traces the path geometry exactly: it is as fast
/// as the limits allow, starting and ending at rest.
///
/// # Example
///
/// ```
/// use path_timing::{KinematicLimits, Trajectory};
/// use path_types::Path;
/// use nalgebra::dvector;
///
/// let path = Path::new(&[dvector![0.0, 0.0, 0.0], dvector![1.0, 0.0, 0.0]], 0.0).unwrap();
/// let limits = KinematicLimits::uniform(3, 1.0, 1.0).unwrap();
///
/// let trajectory = Trajectory::generate(path, &limits).unwrap();
///
/// // Accelerate halfway, decelerate the rest: two seconds in total
/// assert!((trajectory.duration() - 2.0).abs() < 0.01);
///
/// let midpoint = trajectory.position(trajectory.duration() / 2.0);
/// assert!((midpoint[0] - 0.5).abs() < 0.01);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trajectory {
    /// The geometry being followed.
    path: Path,
    /// Timed phase-plane profile, strictly increasing in both arc length
    /// and time, with at least two steps.
    profile: Vec<ProfileStep>,
}

impl Trajectory {
    /// Generate a time-optimal trajectory with default solver options.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::EmptyPath`] for a path of zero length,
    /// [`TrajectoryError::DimensionMismatch`] if path and limits disagree,
    /// and an integration failure if the phase-plane construction diverges.
    pub fn generate(path: Path, limits: &KinematicLimits) -> Result<Self, TrajectoryError> {
        Self::generate_with(path, limits, SolverOptions::default())
    }

    /// Generate a time-optimal trajectory with explicit solver options.
    ///
    /// # Errors
    ///
    /// As [`Trajectory::generate`], plus
    /// [`TrajectoryError::InvalidTimeStep`] for a non-positive time step.
    pub fn generate_with(
        path: Path,
        limits: &KinematicLimits,
        options: SolverOptions,
    ) -> Result<Self, TrajectoryError> {
        if path.is_empty() || path.length() <= 0.0 {
            return Err(TrajectoryError::EmptyPath);
        }
        if limits.dim() != path.dim() {
            return Err(TrajectoryError::dimension_mismatch(path.dim(), limits.dim()));
        }
        let time_step = options.time_step();
        if time_step.is_nan() || time_step <= 0.0 {
            return Err(TrajectoryError::InvalidTimeStep(time_step));
        }

        let profile = Solver::new(&path, limits, time_step).solve()?;
        Ok(Self { path, profile })
    }

    /// Get the total duration in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.profile[self.profile.len() - 1].time
    }

    /// Get the path this trajectory follows.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the timed phase-plane profile.
    #[must_use]
    pub fn profile(&self) -> &[ProfileStep] {
        &self.profile
    }

    /// Configuration at time `t`.
    ///
    /// Times outside `[0, duration]` are clamped, so `position(t)` before
    /// the start is the first waypoint and `position(duration)` (or later)
    /// is exactly the path end.
    #[must_use]
    pub fn position(&self, t: f64) -> Config {
        let t = t.clamp(0.0, self.duration());
        let (path_pos, _) = self.sample(self.index_for(t), t);
        self.path.config_at(path_pos)
    }

    /// Configuration-space velocity at time `t`.
    ///
    /// Times outside `[0, duration]` are clamped; the trajectory is at rest
    /// at both ends.
    #[must_use]
    pub fn velocity(&self, t: f64) -> Config {
        let t = t.clamp(0.0, self.duration());
        let (path_pos, path_vel) = self.sample(self.index_for(t), t);
        self.path.tangent_at(path_pos) * path_vel
    }

    /// Configuration at time `t`, using a caller-held cursor.
    ///
    /// Equivalent to [`Trajectory::position`], but monotone time queries
    /// advance `cursor` instead of searching the profile.
    #[must_use]
    pub fn position_with(&self, cursor: &mut TrajectoryCursor, t: f64) -> Config {
        let t = t.clamp(0.0, self.duration());
        let (path_pos, _) = self.sample(self.index_for_cursor(cursor, t), t);
        self.path.config_at(path_pos)
    }

    /// Configuration-space velocity at time `t`, using a caller-held
    /// cursor.
    #[must_use]
    pub fn velocity_with(&self, cursor: &mut TrajectoryCursor, t: f64) -> Config {
        let t = t.clamp(0.0, self.duration());
        let (path_pos, path_vel) = self.sample(self.index_for_cursor(cursor, t), t);
        self.path.tangent_at(path_pos) * path_vel
    }

    /// Index of the profile step terminating the parabola containing `t`,
    /// by binary search.
    fn index_for(&self, t: f64) -> usize {
        self.profile
            .partition_point(|step| step.time <= t)
            .clamp(1, self.profile.len() - 1)
    }

    /// As [`Trajectory::index_for`], but walking from the cursor position.
    fn index_for_cursor(&self, cursor: &mut TrajectoryCursor, t: f64) -> usize {
        if t >= self.duration() {
            return self.profile.len() - 1;
        }
        if t < cursor.time {
            cursor.index = 1;
        }
        while cursor.index < self.profile.len() - 1 && t >= self.profile[cursor.index].time {
            cursor.index += 1;
        }
        cursor.time = t;
        cursor.index
    }

    /// Evaluate the parabola ending at `profile[index]` at time `t`,
    /// returning path position and velocity.
    fn sample(&self, index: usize, t: f64) -> (f64, f64) {
        let previous = self.profile[index - 1];
        let current = self.profile[index];

        let interval = current.time - previous.time;
        let acceleration = 2.0
            * (current.path_pos - previous.path_pos - interval * previous.path_vel)
            / (interval * interval);

        let tau = t - previous.time;
        let path_pos =
            previous.path_pos + tau * previous.path_vel + 0.5 * tau * tau * acceleration;
        let path_vel = previous.path_vel + tau * acceleration;
        (path_pos, path_vel)
    }
}
