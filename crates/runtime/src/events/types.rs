//! Event types for different topics.

use game_core::{EntityId, Position, Product, ResourceKind, Task};
use serde::{Deserialize, Serialize};

use crate::agent::EntityKind;
use crate::states::EntityStateKind;

/// Events related to the goal and the task queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlannerEvent {
    /// A new goal replaced the previous one and the queue was rebuilt
    GoalSet { goal: Task, queued: usize },

    /// A task was popped from the queue and became current
    TaskStarted { task: Task },

    /// The current task is satisfied and was discarded
    TaskResolved { task: Task },

    /// An urgent task was pushed in front of the current one
    TaskPrepended { task: Task },

    /// Production of a product could not start (retried next tick)
    ProductionFailed { product: Product, error: String },
}

/// Entity lifecycle notifications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityEvent {
    /// The planner created an entity and started its production
    Created { entity: EntityId, kind: EntityKind },

    /// Production finished and the entity became visible
    Spawned {
        entity: EntityId,
        kind: EntityKind,
        location: Position,
    },

    /// The entity was consumed or otherwise removed
    Removed { entity: EntityId, kind: EntityKind },

    /// The entity's behavior state changed
    StateChanged {
        entity: EntityId,
        from: EntityStateKind,
        to: EntityStateKind,
    },
}

/// Resource tally and resource map updates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResourceEvent {
    /// A gatherer delivered one unit home
    Deposited { kind: ResourceKind, total: u32 },

    /// Production consumed units from the tally
    Withdrawn {
        kind: ResourceKind,
        amount: u32,
        remaining: u32,
    },

    /// Newly revealed tiles held deposits
    Discovered { found: Vec<(ResourceKind, Position)> },
}
