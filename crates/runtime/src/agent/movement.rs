//! Stepwise path following.
use game_core::{Path, UnitKind};
use tracing::trace;

use super::dispatch::{Address, MessageKind};
use super::entity::Entity;
use super::world::World;

/// Advances `entity` along its path by one tick.
///
/// Progress accumulates at `dt × move_factor`; a step is taken once it
/// reaches the movement cost of the tile being left. An exhausted path is
/// dropped and the entity receives `ArrivedAtGoal`.
pub(crate) fn step(world: &mut World, entity: &mut Entity) {
    let Some(path) = entity.path.as_mut() else {
        return;
    };

    if let Some(next) = path.next_step() {
        let from = entity.location;
        let threshold = world
            .map
            .tile(from)
            .map_or(1.0, |tile| tile.movement_cost(from, next));

        entity.move_progress += world.delta_time * entity.move_factor;
        if entity.move_progress < threshold {
            return;
        }
        entity.move_progress = 0.0;
        path.advance();
        entity.location = next;
        trace!(entity = %entity.id, %from, to = %next, "stepped");

        if entity.is_unit_of(UnitKind::Explorer) {
            world.reveal_leading_edge(from, next);
        }
    }

    if entity.path.as_ref().is_some_and(Path::is_empty) {
        entity.stop();
        let me = Address::Entity(entity.id);
        world.send(me, me, MessageKind::ArrivedAtGoal);
    }
}
