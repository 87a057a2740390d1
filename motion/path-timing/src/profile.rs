//! Phase-plane profile types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in the phase plane: path position against path velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhasePoint {
    /// Arc length along the path.
    pub path_pos: f64,
    /// Scalar velocity along the path.
    pub path_vel: f64,
}

impl PhasePoint {
    /// Create a phase-plane point.
    #[must_use]
    pub fn new(path_pos: f64, path_vel: f64) -> Self {
        Self { path_pos, path_vel }
    }
}

/// One timed step of a finished velocity profile.
///
/// Between consecutive steps the motion is parabolic: constant path
/// acceleration connects `(path_pos, path_vel)` to the next step over the
/// time interval.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProfileStep {
    /// Arc length along the path.
    pub path_pos: f64,
    /// Scalar velocity along the path.
    pub path_vel: f64,
    /// Time at which this step is reached, measured from trajectory start.
    pub time: f64,
}

impl ProfileStep {
    /// Create a timed profile step.
    #[must_use]
    pub fn new(path_pos: f64, path_vel: f64, time: f64) -> Self {
        Self {
            path_pos,
            path_vel,
            time,
        }
    }
}

/// Caller-held cursor accelerating monotone-time sampling.
///
/// Repeatedly sampling a trajectory with non-decreasing times advances this
/// cursor instead of searching the whole profile, making each query O(1)
/// amortised. Sampling backwards in time resets it, which stays correct but
/// costs a fresh walk. Each thread should hold its own cursor.
#[derive(Debug, Clone, Copy)]
pub struct TrajectoryCursor {
    /// Time of the most recent query.
    pub(crate) time: f64,
    /// Profile index of the step following that query time.
    pub(crate) index: usize,
}

impl TrajectoryCursor {
    /// Create a cursor positioned before the start of the trajectory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            time: f64::INFINITY,
            index: 1,
        }
    }
}

impl Default for TrajectoryCursor {
    fn default() -> Self {
        Self::new()
    }
}
