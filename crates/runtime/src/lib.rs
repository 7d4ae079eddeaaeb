//! Player AI runtime for a tile-based strategy simulation.
//!
//! The agent turns a goal ("two soldiers") into a queue of production,
//! gathering and exploration tasks and drives every unit and structure it
//! owns through a per-entity state machine. Consumers embed [`Runtime`] to
//! tick the agent from a background worker and talk to it through
//! [`RuntimeHandle`], or drive a [`PlayerAi`] directly.
//!
//! Modules are organized by responsibility:
//! - [`agent`] holds the world, the planner and the tick loop
//! - [`states`] defines entity and agent behaviors
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`oracle`] provides map, recipe and path search implementations
//! - `workers` keeps background tasks internal to the crate
pub mod agent;
pub mod api;
pub mod events;
pub mod oracle;
pub mod runtime;
pub mod states;

mod workers;

pub use agent::{
    Address, AgentSnapshot, Entity, EntityKind, EntitySummary, Message, MessageKind, PlayerAi,
    World,
};
pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{EntityEvent, Event, EventBus, PlannerEvent, ResourceEvent, Topic};
pub use oracle::{AStarSearch, MapOracleImpl, OracleManager, RecipeOracleImpl};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use states::{AiState, AiStateKind, EntityState, EntityStateKind};
