//! ZEUS kinematic explorer core.
//!
//! - [`physics::generator`]: rejection-sampling DIS event generator with a toy
//!   initial state radiation spectrum.
//! - [`physics::limits`]: the y = 1 kinematic limit per beam configuration.
//! - [`run`]: batch driver, bounded event buffer and run statistics used by
//!   the terminal front end.

pub mod config;
pub mod error;
pub mod physics;
pub mod run;

pub use error::{Error, Result};
pub use physics::generator::{generate, generate_at, PhysicsEvent};
pub use physics::limits::{compute_limit, KinematicLimitPoint};
pub use physics::{BeamConfig, RunMode, ELECTRON_ENERGY};
