//! The player agent: world state, planner and the tick that drives every
//! entity machine.
//!
//! One [`PlayerAi::update`] runs, in order:
//!
//! 1. path completions that arrived since the last tick
//! 2. the agent's own machine (global state first)
//! 3. the planner's current task
//! 4. movement, then the state machine, of every entity
//!
//! Cross-machine effects queued by a hook are delivered right after it.
mod dispatch;
mod entity;
mod movement;
mod pathfinding;
mod planner;
mod production;
mod snapshot;
mod stores;
mod world;

use game_core::{EntityFlags, EntityId, GameConfig, Position, Task};
use state_machine::{Kinded, StateMachine};
use tracing::{debug, info, trace};

use crate::api::{Result, RuntimeError};
use crate::events::{EntityEvent, EventBus};
use crate::oracle::OracleManager;
use crate::states::{AiState, AiStateKind, EntityContext, EntityState};

pub use dispatch::{Address, Message, MessageKind};
pub use entity::{Entity, EntityKind, EntityStore};
pub use pathfinding::{PathCompletion, PathPurpose, PathfindingBridge};
pub use snapshot::{AgentSnapshot, EntitySummary};
pub use stores::{ResourceMap, ResourceTally};
pub use world::World;

pub(crate) use dispatch::Dispatch;
pub(crate) use pathfinding::PathRequest;
pub(crate) use production::spawn;

/// Owns the world, the agent machine and the pathfinding bridge.
pub struct PlayerAi {
    world: World,
    machine: StateMachine<AiState>,
    pathfinder: PathfindingBridge,
    ready: Vec<PathCompletion>,
}

impl PlayerAi {
    /// Creates an agent at `start`. Must be called inside a tokio runtime.
    pub fn new(
        config: GameConfig,
        oracles: &OracleManager,
        start: Position,
        seed: u64,
        events: EventBus,
    ) -> Result<Self> {
        let map = oracles.map();
        if !map.is_passable(start) {
            return Err(RuntimeError::StartOutOfBounds(start));
        }
        let pathfinder = PathfindingBridge::new(oracles.search())?;
        let world = World::new(config, map, oracles.recipes(), start, seed, events);

        info!(%start, seed, "player agent created");
        Ok(Self {
            world,
            machine: StateMachine::with_global(AiState::Idle, AiState::global()),
            pathfinder,
            ready: Vec::new(),
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current agent-level state.
    pub fn state_kind(&self) -> AiStateKind {
        self.machine.current_kind()
    }

    pub fn in_flight_paths(&self) -> usize {
        self.pathfinder.in_flight()
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot::capture(&self.world, self.state_kind())
    }

    pub fn set_goal(&mut self, goal: Task) {
        self.world.set_goal(goal);
    }

    /// Places a finished, idle entity, bypassing production.
    pub fn spawn_entity(&mut self, kind: EntityKind, location: Position) -> EntityId {
        let id = self.world.entities.allocate_id();
        let mut entity = Entity::new(id, kind, location, EntityState::Idle);
        entity.flags.insert(EntityFlags::VISIBLE);
        self.world.entities.insert(entity);

        debug!(entity = %id, %kind, %location, "entity placed");
        self.world.publish(EntityEvent::Spawned {
            entity: id,
            kind,
            location,
        });
        id
    }

    /// Moves an entity to `state` immediately.
    pub fn change_entity_state(&mut self, entity: EntityId, state: EntityState) {
        self.world.change_state(entity, state);
        self.flush();
    }

    /// Delivers `kind` from the agent to `to` immediately.
    pub fn send_message(&mut self, to: Address, kind: MessageKind) {
        self.world.send(Address::Agent, to, kind);
        self.flush();
    }

    /// Waits for every outstanding path search; the results are applied on
    /// the next update.
    pub async fn settle(&mut self) {
        let completions = self.pathfinder.settle().await;
        self.ready.extend(completions);
    }

    /// Advances the agent by `dt` time units.
    pub fn update(&mut self, dt: f32) {
        self.world.delta_time = dt;

        self.deliver_paths();

        self.machine.update(&mut self.world);
        self.flush();

        self.world.advance_task();
        self.world.check_current_task();
        self.flush();

        for id in self.world.entities.ids() {
            self.world.with_entity(id, movement::step);
            self.flush();
            self.with_machine(id, |machine, ctx| machine.update(ctx));
            self.flush();
        }
    }

    fn deliver_paths(&mut self) {
        let mut completions = std::mem::take(&mut self.ready);
        completions.extend(self.pathfinder.drain());

        for completion in completions {
            let PathCompletion {
                entity,
                generation,
                purpose,
                path,
            } = completion;
            let current = self.world.entity(entity).and_then(Entity::generation);
            if current != Some(generation) {
                trace!(%entity, generation, ?current, "stale path completion dropped");
                continue;
            }
            self.with_machine(entity, |machine, ctx| {
                machine.current_mut().resume_path(ctx, purpose, path);
            });
            self.flush();
        }
    }

    /// Runs `f` against entity `id` and its machine, then launches the path
    /// searches the hook queued, stamped with the machine's generation.
    fn with_machine<R>(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut StateMachine<EntityState>, &mut EntityContext<'_>) -> R,
    ) -> Option<R> {
        let (result, generation) = self
            .world
            .with_entity(id, |world, entity| {
                let mut machine = entity.machine.take()?;
                let result = f(&mut machine, &mut EntityContext::new(world, entity));
                let generation = machine.generation();
                entity.machine = Some(machine);
                Some((result, generation))
            })
            .flatten()?;

        for request in std::mem::take(&mut self.world.path_requests) {
            self.pathfinder.find_path(request, generation);
        }
        Some(result)
    }

    /// Delivers queued dispatches in order, including the ones they queue.
    fn flush(&mut self) {
        while let Some(dispatch) = self.world.dispatcher.pop() {
            match dispatch {
                Dispatch::Message {
                    to: Address::Agent,
                    message,
                } => {
                    if !self.machine.handle_message(&mut self.world, &message) {
                        trace!(kind = %message.kind, sender = ?message.sender, "agent ignored message");
                    }
                }
                Dispatch::Message {
                    to: Address::Entity(id),
                    message,
                } => {
                    let handled =
                        self.with_machine(id, |machine, ctx| machine.handle_message(ctx, &message));
                    if handled != Some(true) {
                        trace!(entity = %id, kind = %message.kind, "message dropped");
                    }
                }
                Dispatch::ChangeState { entity, state } => {
                    let to = state.kind();
                    let changed = self.with_machine(entity, |machine, ctx| {
                        machine.change_state(ctx, state).kind()
                    });
                    if let Some(from) = changed {
                        debug!(%entity, %from, %to, "entity state changed");
                        self.world
                            .publish(EntityEvent::StateChanged { entity, from, to });
                    }
                }
                Dispatch::SwitchAgentState(state) => {
                    if self.machine.is_in_state(state.kind()) {
                        continue;
                    }
                    let to = state.kind();
                    let from = self.machine.change_state(&mut self.world, state).kind();
                    info!(%from, %to, "agent state switched");
                }
            }
        }
    }
}

impl std::fmt::Debug for PlayerAi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerAi")
            .field("state", &self.state_kind())
            .field("goal", &self.world.goal)
            .field("current_task", &self.world.current_task)
            .field("entities", &self.world.entities.len())
            .field("in_flight_paths", &self.pathfinder.in_flight())
            .finish()
    }
}
