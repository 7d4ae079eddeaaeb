//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the player agent and serves commands from
//! [`crate::RuntimeHandle`] one at a time.

mod simulation;

pub use simulation::{Command, SimulationWorker};
