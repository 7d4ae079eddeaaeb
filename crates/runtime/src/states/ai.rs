//! Agent-level states: the always-on global state and the orchestration
//! modes the planner switches between.
use game_core::{EntityId, Task, UnitKind};
use serde::{Deserialize, Serialize};
use state_machine::{Kinded, State};
use strum::EnumDiscriminants;
use tracing::debug;

use super::{Cooldown, EntityState, EntityStateKind};
use crate::agent::{Message, MessageKind, World};

#[derive(Clone, Debug, EnumDiscriminants)]
#[strum_discriminants(
    name(AiStateKind),
    derive(Hash, strum::Display, Serialize, Deserialize)
)]
pub enum AiState {
    /// Rebuilds the task queue from the goal every task-update interval.
    Global(Cooldown),
    Idle,
    /// Keeps workers gathering the nominated resource.
    Gather(Cooldown),
    /// Keeps explorers wandering.
    Explore(Cooldown),
}

impl AiState {
    pub fn global() -> Self {
        AiState::Global(Cooldown::default())
    }

    pub fn gather() -> Self {
        AiState::Gather(Cooldown::default())
    }

    pub fn explore() -> Self {
        AiState::Explore(Cooldown::default())
    }
}

impl Kinded for AiState {
    type Kind = AiStateKind;

    fn kind(&self) -> AiStateKind {
        AiStateKind::from(self)
    }
}

impl State<World> for AiState {
    type Message = Message;

    fn enter(&mut self, world: &mut World) {
        let config = &world.config;
        match self {
            AiState::Global(cooldown) => *cooldown = Cooldown::new(config.task_update_interval),
            AiState::Gather(cooldown) => *cooldown = Cooldown::new(config.gather_update_interval),
            AiState::Explore(cooldown) => {
                *cooldown = Cooldown::new(config.explore_update_interval)
            }
            AiState::Idle => {}
        }
        debug!(state = %self.kind(), "agent entered state");
    }

    fn execute(&mut self, world: &mut World) {
        let dt = world.delta_time;
        match self {
            AiState::Global(cooldown) => {
                if cooldown.tick(dt) {
                    world.update_task_list();
                }
            }
            AiState::Gather(cooldown) => {
                if cooldown.tick(dt) {
                    orchestrate_gather(world);
                }
            }
            AiState::Explore(cooldown) => {
                if cooldown.tick(dt) {
                    orchestrate_explore(world);
                }
            }
            AiState::Idle => {}
        }
    }

    fn on_message(&mut self, _world: &mut World, message: &Message) -> bool {
        match (self, message.kind) {
            (
                AiState::Global(_),
                MessageKind::NewWorkerUnit
                | MessageKind::NewExplorerUnit
                | MessageKind::NewArtisanUnit
                | MessageKind::NewSoldierUnit
                | MessageKind::StructureCompleted,
            ) => {
                debug!(kind = %message.kind, sender = ?message.sender, "agent notified");
                true
            }
            _ => false,
        }
    }
}

/// Moves idle workers into Gather and asks for more workers while too few
/// are gathering. Idle workers the current task consumes are left alone.
fn orchestrate_gather(world: &mut World) {
    let active = world.units_in_state(UnitKind::Worker, EntityStateKind::Gather);
    let reserved = world.idle_units_reserved(UnitKind::Worker);
    let idle: Vec<EntityId> = world
        .idle_units(UnitKind::Worker)
        .map(|worker| worker.id)
        .collect();

    let room = world.config.gather_conversion_cap.saturating_sub(active) as usize;
    let converted: Vec<EntityId> = idle.into_iter().skip(reserved as usize).take(room).collect();
    for &worker in &converted {
        world.change_state(worker, EntityState::gather());
    }
    if !converted.is_empty() {
        debug!(active, converted = converted.len(), "workers sent gathering");
    }

    if active < world.config.gather_target {
        let total = world.unit_count(UnitKind::Worker);
        world.prepend_task(Task::new(UnitKind::Worker, total + 1));
    }
}

/// Sends idle explorers out and asks for explorers up to the target.
fn orchestrate_explore(world: &mut World) {
    let idle: Vec<EntityId> = world
        .idle_units(UnitKind::Explorer)
        .map(|explorer| explorer.id)
        .collect();
    for &explorer in &idle {
        world.change_state(explorer, EntityState::explore());
    }

    let target = world.config.explorer_target;
    if world.unit_count(UnitKind::Explorer) < target {
        world.prepend_task(Task::new(UnitKind::Explorer, target));
    }
}
