//! Behavior states for entities and for the agent itself.
//!
//! Entity states run against an [`EntityContext`] (the agent's world plus the
//! entity being driven); agent states run against the [`World`] directly.
//! Both are closed enumerations so `is_in_state` is a discriminant check.
mod ai;
mod artisan;
mod explore;
mod gather;
mod production;

use game_core::{EntityId, Path, Position};
use serde::{Deserialize, Serialize};
use state_machine::{Kinded, State};
use strum::EnumDiscriminants;
use tracing::trace;

use crate::agent::{Address, Entity, Message, MessageKind, PathPurpose, PathRequest, World};

pub use ai::{AiState, AiStateKind};
pub use artisan::{ArtisanStage, ArtisanState, WaitForArtisan};
pub use explore::{Explore, ExploreStage};
pub use gather::{Gather, GatherStage};
pub use production::Produced;

/// What an entity state hook can reach: the agent's world and the entity
/// itself (taken out of the store while the hook runs).
pub struct EntityContext<'w> {
    pub(crate) world: &'w mut World,
    pub(crate) entity: &'w mut Entity,
}

impl<'w> EntityContext<'w> {
    pub(crate) fn new(world: &'w mut World, entity: &'w mut Entity) -> Self {
        Self { world, entity }
    }

    pub fn id(&self) -> EntityId {
        self.entity.id
    }

    /// Elapsed time of the current tick.
    pub fn dt(&self) -> f32 {
        self.world.delta_time
    }

    pub fn world(&self) -> &World {
        self.world
    }

    pub fn entity(&self) -> &Entity {
        self.entity
    }

    /// Queues `kind` from this entity to another one.
    pub(crate) fn send(&mut self, to: EntityId, kind: MessageKind) {
        self.world
            .send(Address::Entity(self.entity.id), Address::Entity(to), kind);
    }

    /// Queues `kind` from this entity to the agent.
    pub(crate) fn notify_agent(&mut self, kind: MessageKind) {
        self.world
            .send(Address::Entity(self.entity.id), Address::Agent, kind);
    }

    /// Queues a transition of this entity, applied after the hook returns.
    pub(crate) fn change_state(&mut self, state: EntityState) {
        self.world.change_state(self.entity.id, state);
    }

    /// Queues a path search from the entity's location to `goal`.
    ///
    /// With `use_fog` the search only crosses discovered tiles.
    pub(crate) fn request_path(&mut self, goal: Position, purpose: PathPurpose, use_fog: bool) {
        let filter = use_fog.then(|| self.world.terrain.fog_filter());
        self.world.path_requests.push(PathRequest {
            entity: self.entity.id,
            start: self.entity.location,
            goal,
            purpose,
            filter,
        });
    }

    /// Installs a freshly found path and restarts movement.
    pub(crate) fn follow(&mut self, path: Path) {
        self.entity.path = Some(path);
        self.entity.move_progress = 0.0;
    }
}

/// Fires once every `interval` time units.
///
/// The check happens before the tick's time is added, so the first check of
/// an activation fires only for a zero interval.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cooldown {
    interval: f32,
    elapsed: f32,
}

impl Cooldown {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn tick(&mut self, dt: f32) -> bool {
        let ready = self.elapsed >= self.interval;
        if ready {
            self.elapsed = 0.0;
        }
        self.elapsed += dt;
        ready
    }
}

/// Every behavior an entity can be in.
#[derive(Clone, Debug, EnumDiscriminants)]
#[strum_discriminants(
    name(EntityStateKind),
    derive(Hash, strum::Display, Serialize, Deserialize)
)]
pub enum EntityState {
    /// Waiting to be claimed; sets the entity's idle flag.
    Idle,
    /// No behavior; only external callers move an entity out of it.
    Locked,
    Gather(Gather),
    Explore(Explore),
    WaitForArtisan(WaitForArtisan),
    Artisan(ArtisanState),
    Produced(Produced),
}

impl EntityState {
    pub fn gather() -> Self {
        EntityState::Gather(Gather::default())
    }

    pub fn explore() -> Self {
        EntityState::Explore(Explore::default())
    }

    pub fn artisan() -> Self {
        EntityState::Artisan(ArtisanState::default())
    }

    pub fn produced() -> Self {
        EntityState::Produced(Produced::default())
    }

    pub fn wait_for_artisan(profession: game_core::Profession) -> Self {
        EntityState::WaitForArtisan(WaitForArtisan::new(profession))
    }

    /// Hands a finished path search back to the state that issued it.
    pub(crate) fn resume_path(
        &mut self,
        ctx: &mut EntityContext<'_>,
        purpose: PathPurpose,
        path: Option<Path>,
    ) {
        match self {
            EntityState::Gather(state) => state.resume_path(ctx, purpose, path),
            EntityState::Explore(state) => state.resume_path(ctx, path),
            EntityState::Artisan(state) => state.resume_path(ctx, path),
            other => trace!(
                entity = %ctx.id(),
                state = %other.kind(),
                "path completion ignored"
            ),
        }
    }
}

impl Kinded for EntityState {
    type Kind = EntityStateKind;

    fn kind(&self) -> EntityStateKind {
        EntityStateKind::from(self)
    }
}

impl<'w> State<EntityContext<'w>> for EntityState {
    type Message = Message;

    fn enter(&mut self, ctx: &mut EntityContext<'w>) {
        match self {
            EntityState::Idle => ctx.entity.flags.insert(game_core::EntityFlags::IDLE),
            EntityState::Locked => {}
            EntityState::Gather(state) => state.enter(ctx),
            EntityState::Explore(state) => state.enter(),
            EntityState::WaitForArtisan(state) => state.enter(ctx),
            EntityState::Artisan(state) => state.enter(),
            EntityState::Produced(state) => state.enter(),
        }
    }

    fn execute(&mut self, ctx: &mut EntityContext<'w>) {
        match self {
            EntityState::Idle | EntityState::Locked => {}
            EntityState::Gather(state) => state.execute(ctx),
            EntityState::Explore(state) => state.execute(ctx),
            EntityState::WaitForArtisan(state) => state.execute(ctx),
            EntityState::Artisan(state) => state.execute(ctx),
            EntityState::Produced(state) => state.execute(ctx),
        }
    }

    fn exit(&mut self, ctx: &mut EntityContext<'w>) {
        match self {
            EntityState::Idle => ctx.entity.flags.remove(game_core::EntityFlags::IDLE),
            EntityState::Gather(state) => state.exit(ctx),
            EntityState::Explore(_) | EntityState::Artisan(_) => ctx.entity.stop(),
            EntityState::Locked | EntityState::WaitForArtisan(_) | EntityState::Produced(_) => {}
        }
    }

    fn on_message(&mut self, ctx: &mut EntityContext<'w>, message: &Message) -> bool {
        match self {
            EntityState::Gather(state) => state.on_message(ctx, message),
            EntityState::Explore(state) => state.on_message(message),
            EntityState::WaitForArtisan(state) => state.on_message(ctx, message),
            EntityState::Artisan(state) => state.on_message(ctx, message),
            EntityState::Idle | EntityState::Locked | EntityState::Produced(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_checks_before_accumulating() {
        let mut cooldown = Cooldown::new(2.0);
        let fired: Vec<bool> = (0..6).map(|_| cooldown.tick(1.0)).collect();
        assert_eq!(fired, [false, false, true, false, true, false]);
    }

    #[test]
    fn zero_interval_fires_every_tick() {
        let mut cooldown = Cooldown::new(0.0);
        assert!((0..3).all(|_| cooldown.tick(1.0)));
    }

    #[test]
    fn state_kind_is_the_variant() {
        assert_eq!(EntityStateKind::WaitForArtisan.to_string(), "WaitForArtisan");
        assert_eq!(EntityState::gather().kind(), EntityStateKind::Gather);
    }
}
