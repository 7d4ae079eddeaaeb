//! Lightweight layered state machine for tick-driven game agents.
//!
//! A [`StateMachine`] owns exactly one *current* state and an optional
//! *global* state that runs before it on every update. States are plain
//! values (usually the variants of one closed enum) implementing [`State`]
//! against a caller-supplied context type, so the machine itself holds no
//! references into the game world.
//!
//! - **Lazy entry**: the first update, message or transition enters the
//!   states, so `execute` never runs on a state that was not entered
//! - **Exit before enter**: transitions always leave the outgoing state
//!   before the incoming one is entered, including self-transitions
//! - **Generations**: every transition bumps a counter that callers can use
//!   to recognise work issued by an activation that no longer exists
//! - **Zero dependencies**
//!
//! # Architecture
//!
//! - [`Kinded`]: state discriminants
//! - [`State`]: lifecycle hooks and message handling
//! - [`StateMachine`]: current + global slot, update and dispatch

pub mod machine;
pub mod state;

pub use machine::StateMachine;
pub use state::{Kinded, State};
