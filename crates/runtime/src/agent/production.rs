//! Finishing production: the entity appears on the map and releases what it
//! held while being produced.
use game_core::EntityFlags;
use tracing::info;

use super::dispatch::MessageKind;
use super::entity::EntityKind;
use crate::events::EntityEvent;
use crate::states::{EntityContext, EntityState};

/// Spawns the entity driven by `ctx`.
///
/// Units appear on their origin structure, release it and absorb the units
/// they consumed. Structures free their builder and either wait for staff or
/// go idle.
pub(crate) fn spawn(ctx: &mut EntityContext<'_>) {
    let id = ctx.entity.id;
    let kind = ctx.entity.kind;
    ctx.entity.flags.insert(EntityFlags::VISIBLE);

    let locked = std::mem::take(&mut ctx.entity.locked_structures);
    let consumed = std::mem::take(&mut ctx.entity.consumed_units);

    if kind.is_unit() {
        let origin = locked
            .first()
            .or(consumed.first())
            .and_then(|source| ctx.world.entities.get(*source))
            .map(|source| source.location);
        ctx.entity.location = origin.unwrap_or(ctx.world.start_position);
    }
    for structure in locked {
        ctx.world.change_state(structure, EntityState::Idle);
    }
    for unit in consumed {
        ctx.world.remove_entity(unit);
    }

    match kind {
        EntityKind::Unit(unit) => {
            ctx.change_state(EntityState::Idle);
            ctx.notify_agent(MessageKind::new_unit(unit));
            if unit == game_core::UnitKind::Explorer {
                let radius = ctx.world.config.reveal_radius;
                ctx.world.reveal_around(ctx.entity.location, radius);
            }
        }
        EntityKind::Structure(_) => {
            if let Some(builder) = ctx.entity.artisan.take() {
                ctx.world.change_state(builder, EntityState::artisan());
            }
            ctx.entity.artisan_required = None;
            let staff = ctx
                .world
                .recipes
                .recipe(kind.product())
                .and_then(|recipe| recipe.staffed_by);
            match staff {
                Some(profession) => ctx.change_state(EntityState::wait_for_artisan(profession)),
                None => ctx.change_state(EntityState::Idle),
            }
            ctx.notify_agent(MessageKind::StructureCompleted);
        }
    }

    let location = ctx.entity.location;
    info!(entity = %id, %kind, %location, "entity spawned");
    ctx.world.publish(EntityEvent::Spawned {
        entity: id,
        kind,
        location,
    });
}
