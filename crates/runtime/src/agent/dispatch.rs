//! Message protocol and the deferred dispatch queue.
//!
//! Hooks never call into another machine directly. They queue a [`Dispatch`]
//! and the agent delivers the queue, in order, as soon as the hook returns.
use std::collections::VecDeque;

use game_core::{EntityId, UnitKind};
use serde::{Deserialize, Serialize};

use crate::states::{AiState, EntityState};

/// Where a message comes from or goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Address {
    /// The agent's own machine.
    Agent,
    Entity(EntityId),
}

impl Address {
    pub fn entity(self) -> Option<EntityId> {
        match self {
            Address::Agent => None,
            Address::Entity(id) => Some(id),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum MessageKind {
    ArrivedAtGoal,
    ArtisanNeeded,
    ArtisanArrived,
    NewWorkerUnit,
    NewExplorerUnit,
    NewArtisanUnit,
    NewSoldierUnit,
    StructureCompleted,
}

impl MessageKind {
    /// Spawn notification for a freshly produced unit.
    pub fn new_unit(kind: UnitKind) -> Self {
        match kind {
            UnitKind::Worker => MessageKind::NewWorkerUnit,
            UnitKind::Explorer => MessageKind::NewExplorerUnit,
            UnitKind::Artisan => MessageKind::NewArtisanUnit,
            UnitKind::Soldier => MessageKind::NewSoldierUnit,
        }
    }
}

/// Immutable signal between machines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Address,
    pub kind: MessageKind,
}

impl Message {
    pub fn new(sender: Address, kind: MessageKind) -> Self {
        Self { sender, kind }
    }
}

/// A cross-machine effect waiting for delivery.
#[derive(Debug)]
pub(crate) enum Dispatch {
    Message { to: Address, message: Message },
    ChangeState { entity: EntityId, state: EntityState },
    /// Skipped when the agent is already in a state of the same kind.
    SwitchAgentState(AiState),
}

#[derive(Debug, Default)]
pub(crate) struct Dispatcher {
    queue: VecDeque<Dispatch>,
}

impl Dispatcher {
    pub(crate) fn push(&mut self, dispatch: Dispatch) {
        self.queue.push_back(dispatch);
    }

    pub(crate) fn pop(&mut self) -> Option<Dispatch> {
        self.queue.pop_front()
    }
}
