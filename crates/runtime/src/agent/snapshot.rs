//! Serializable view of the agent for clients and tests.
use game_core::{EntityId, Position, Profession, ResourceKind, Task};
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityKind};
use super::world::World;
use crate::states::{AiStateKind, EntityStateKind};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub id: EntityId,
    pub kind: EntityKind,
    pub location: Position,
    pub state: Option<EntityStateKind>,
    pub profession: Profession,
    pub idle: bool,
    pub visible: bool,
}

impl From<&Entity> for EntitySummary {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind,
            location: entity.location,
            state: entity.state_kind(),
            profession: entity.profession,
            idle: entity.is_idle(),
            visible: entity.is_visible(),
        }
    }
}

/// Planner, entity and resource state after a tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub goal: Option<Task>,
    pub current_task: Option<Task>,
    pub tasks: Vec<Task>,
    pub ai_state: AiStateKind,
    pub entities: Vec<EntitySummary>,
    pub resources: Vec<(ResourceKind, u32)>,
    pub discovered_tiles: usize,
    /// Known deposits per resource type.
    pub found: Vec<(ResourceKind, usize)>,
}

impl AgentSnapshot {
    pub(crate) fn capture(world: &World, ai_state: AiStateKind) -> Self {
        Self {
            goal: world.goal,
            current_task: world.current_task,
            tasks: world.tasks.iter().copied().collect(),
            ai_state,
            entities: world.entities.iter().map(EntitySummary::from).collect(),
            resources: world.resources.iter().collect(),
            discovered_tiles: world.terrain.discovered_count(),
            found: world
                .resource_map
                .kinds()
                .map(|kind| (kind, world.resource_map.count(kind)))
                .collect(),
        }
    }

    /// Entities of `kind` that finished production.
    pub fn visible(&self, kind: EntityKind) -> usize {
        self.entities
            .iter()
            .filter(|entity| entity.kind == kind && entity.visible)
            .count()
    }
}
