//! Time-optimal trajectory generation along waypoint paths.
//!
//! Given a geometric path from the `path-types` crate and per-axis
//! velocity and acceleration bounds, this crate computes the fastest
//! traversal of the path that respects the bounds, following Kunz &
//! Stilman's phase-plane method:
//!
//! - [`KinematicLimits`] - validated per-axis symmetric bounds
//! - [`SolverOptions`] - integration tuning (time step)
//! - [`Trajectory`] - the finished timed profile with position/velocity
//!   sampling
//! - [`TrajectoryCursor`] - caller-held cursor for O(1) monotone sampling
//! - [`sample_limit_curves`] - phase-plane limit curves as data, for
//!   diagnostics and plotting
//!
//! # How It Works
//!
//! Along a fixed path, the only freedom left is *when* the system is where:
//! a scalar velocity profile over arc length. The solver integrates the
//! phase plane (path position, path velocity) forward at maximum
//! acceleration and backward at maximum deceleration, switching between the
//! two at discovered switching points, and clips the profile against the
//! velocity and acceleration limit curves. The result is a bang-bang
//! profile: at every instant either some axis saturates a bound or the
//! system rides a limit curve.
//!
//! The trajectory starts and ends at rest, and comes to rest at every sharp
//! (unblended) corner, since crossing a tangent discontinuity at speed
//! would need infinite acceleration.
//!
//! # Example
//!
//! ```
//! use path_timing::{KinematicLimits, Trajectory};
//! use path_types::Path;
//! use nalgebra::dvector;
//!
//! let path = Path::new(
//!     &[
//!         dvector![0.0, 0.0, 0.0],
//!         dvector![1.0, 0.0, 0.0],
//!         dvector![1.0, 1.0, 0.0],
//!     ],
//!     0.1,
//! )
//! .unwrap();
//! let limits = KinematicLimits::uniform(3, 1.0, 1.0).unwrap();
//!
//! let trajectory = Trajectory::generate(path, &limits).unwrap();
//!
//! // Sample at fixed control rate
//! let mut t = 0.0;
//! while t < trajectory.duration() {
//!     let position = trajectory.position(t);
//!     let velocity = trajectory.velocity(t);
//!     assert!(velocity.amax() <= 1.0 + 1e-3);
//!     t += 0.01;
//!     # let _ = position;
//! }
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for profiles, limits and
//!   trajectories

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
    clippy::too_many_lines,
    clippy::while_float,
    clippy::float_cmp,
    clippy::needless_range_loop,
    clippy::cast_precision_loss
)]

mod diagnostics;
mod error;
mod limits;
mod profile;
mod solver;
mod trajectory;

pub use diagnostics::{sample_limit_curves, LimitCurveSample};
pub use error::TrajectoryError;
pub use limits::KinematicLimits;
pub use profile::{PhasePoint, ProfileStep, TrajectoryCursor};
pub use solver::SolverOptions;
pub use trajectory::Trajectory;

// Re-export the geometry layer for convenience
pub use path_types::{Config, Path};
