//! Agent-owned world: entities, resources, fog and the task queue.
//!
//! Every state hook reaches the agent through this type. Effects on other
//! machines are queued on the dispatcher instead of being applied in place.
use std::collections::VecDeque;
use std::sync::Arc;

use game_core::{
    EntityId, GameConfig, MapOracle, Position, RecipeOracle, ResourceKind, StructureKind, Task,
    UnitKind, WorldMap,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use super::dispatch::{Address, Dispatch, Dispatcher, Message, MessageKind};
use super::entity::{Entity, EntityStore};
use super::pathfinding::PathRequest;
use super::stores::{ResourceMap, ResourceTally};
use crate::events::{EntityEvent, Event, EventBus, ResourceEvent};
use crate::states::{AiState, EntityState, EntityStateKind};

pub struct World {
    pub(crate) config: GameConfig,
    pub(crate) map: Arc<dyn MapOracle>,
    pub(crate) recipes: Arc<dyn RecipeOracle>,
    pub(crate) terrain: WorldMap,
    pub(crate) start_position: Position,
    pub(crate) entities: EntityStore,
    pub(crate) resources: ResourceTally,
    pub(crate) resource_map: ResourceMap,
    pub(crate) goal: Option<Task>,
    pub(crate) current_task: Option<Task>,
    pub(crate) tasks: VecDeque<Task>,
    pub(crate) target_resource: Option<ResourceKind>,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) path_requests: Vec<PathRequest>,
    pub(crate) rng: StdRng,
    pub(crate) delta_time: f32,
    pub(crate) events: EventBus,
}

impl World {
    /// Creates the world around `start`, with the home area already
    /// discovered.
    pub(crate) fn new(
        config: GameConfig,
        map: Arc<dyn MapOracle>,
        recipes: Arc<dyn RecipeOracle>,
        start: Position,
        seed: u64,
        events: EventBus,
    ) -> Self {
        let terrain = WorldMap::from_oracle(map.as_ref());
        let mut world = Self {
            config,
            map,
            recipes,
            terrain,
            start_position: start,
            entities: EntityStore::default(),
            resources: ResourceTally::default(),
            resource_map: ResourceMap::default(),
            goal: None,
            current_task: None,
            tasks: VecDeque::new(),
            target_resource: None,
            dispatcher: Dispatcher::default(),
            path_requests: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            delta_time: 0.0,
            events,
        };
        let home_radius = world.config.buildable_radius + world.config.reveal_radius;
        world.reveal_around(start, home_radius);
        world
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn resources(&self) -> &ResourceTally {
        &self.resources
    }

    pub fn resource_map(&self) -> &ResourceMap {
        &self.resource_map
    }

    pub fn terrain(&self) -> &WorldMap {
        &self.terrain
    }

    pub fn start_position(&self) -> Position {
        self.start_position
    }

    pub fn goal(&self) -> Option<Task> {
        self.goal
    }

    pub fn current_task(&self) -> Option<Task> {
        self.current_task
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn target_resource(&self) -> Option<ResourceKind> {
        self.target_resource
    }

    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    pub(crate) fn send(&mut self, from: Address, to: Address, kind: MessageKind) {
        self.dispatcher.push(Dispatch::Message {
            to,
            message: Message::new(from, kind),
        });
    }

    pub(crate) fn change_state(&mut self, entity: EntityId, state: EntityState) {
        self.dispatcher.push(Dispatch::ChangeState { entity, state });
    }

    pub(crate) fn switch_agent_state(&mut self, state: AiState) {
        self.dispatcher.push(Dispatch::SwitchAgentState(state));
    }

    pub(crate) fn publish(&self, event: impl Into<Event>) {
        self.events.publish(event);
    }

    /// Runs `f` with entity `id` taken out of the store.
    pub(crate) fn with_entity<R>(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut World, &mut Entity) -> R,
    ) -> Option<R> {
        let mut entity = self.entities.remove(id)?;
        let result = f(self, &mut entity);
        self.entities.insert(entity);
        Some(result)
    }

    pub(crate) fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(id)?;
        debug!(entity = %id, kind = %entity.kind, "entity removed");
        self.publish(EntityEvent::Removed {
            entity: id,
            kind: entity.kind,
        });
        Some(entity)
    }

    // ------------------------------------------------------------------
    // Entity queries
    // ------------------------------------------------------------------

    /// Every unit of `kind`, including those still in production.
    pub fn unit_count(&self, kind: UnitKind) -> u32 {
        self.entities.units(kind).count() as u32
    }

    pub fn structure_count(&self, kind: StructureKind) -> u32 {
        self.entities.structures(kind).count() as u32
    }

    pub fn units_in_state(&self, kind: UnitKind, state: EntityStateKind) -> u32 {
        self.entities
            .units(kind)
            .filter(|unit| unit.is_in_state(state))
            .count() as u32
    }

    /// Units of `kind` in the Idle state, in creation order.
    pub fn idle_units(&self, kind: UnitKind) -> impl Iterator<Item = &Entity> {
        self.entities
            .units(kind)
            .filter(|unit| unit.is_in_state(EntityStateKind::Idle))
    }

    pub fn idle_structures(&self, kind: StructureKind) -> impl Iterator<Item = &Entity> {
        self.entities
            .structures(kind)
            .filter(|structure| structure.is_in_state(EntityStateKind::Idle))
    }

    pub fn has_unit(&self, kind: UnitKind, amount: u32) -> bool {
        self.unit_count(kind) >= amount
    }

    pub fn has_structure(&self, kind: StructureKind) -> bool {
        self.structure_count(kind) > 0
    }

    pub fn has_available_unit(&self, kind: UnitKind, amount: u32) -> bool {
        self.idle_units(kind).count() as u32 >= amount
    }

    pub fn has_available_structure(&self, kind: StructureKind, amount: u32) -> bool {
        self.idle_structures(kind).count() as u32 >= amount.max(1)
    }

    /// Whether a structure (finished or not) already stands on `position`.
    pub fn is_structure_at(&self, position: Position) -> bool {
        self.entities
            .iter()
            .any(|entity| entity.kind.is_structure() && entity.location == position)
    }

    // ------------------------------------------------------------------
    // Resources and fog
    // ------------------------------------------------------------------

    /// Closest known deposit of `kind` that still has an unclaimed unit.
    pub fn nearest_free_resource(&self, kind: ResourceKind, from: Position) -> Option<Position> {
        self.resource_map
            .positions(kind)
            .filter(|position| self.terrain.has_free_resource(*position, kind))
            .min_by_key(|position| position.distance_squared(from))
    }

    /// Consumes the unit a gatherer occupies, forgetting exhausted deposits.
    pub(crate) fn collect_resource(&mut self, position: Position, kind: ResourceKind) {
        if !self.terrain.deduct_resource(position, kind) {
            trace!(%position, %kind, "nothing to deduct");
        }
        let exhausted = !self
            .terrain
            .deposits_at(position)
            .iter()
            .any(|deposit| deposit.kind == kind);
        if exhausted {
            self.resource_map.forget(kind, position);
        }
    }

    /// Credits delivered cargo to the tally.
    pub(crate) fn deposit(&mut self, kind: ResourceKind, amount: u32) {
        let total = self.resources.add(kind, amount);
        debug!(%kind, total, "resource delivered");
        self.publish(ResourceEvent::Deposited { kind, total });
    }

    pub(crate) fn withdraw(&mut self, kind: ResourceKind, amount: u32) -> bool {
        if !self.resources.withdraw(kind, amount) {
            return false;
        }
        self.publish(ResourceEvent::Withdrawn {
            kind,
            amount,
            remaining: self.resources.count(kind),
        });
        true
    }

    /// Lifts the fog in a square of `radius` around `center`.
    pub(crate) fn reveal_around(&mut self, center: Position, radius: u32) {
        let found = self.terrain.discover_around(center, radius as i32);
        self.record_discoveries(found);
    }

    /// Lifts the fog on the edge ahead of a unit that stepped `from` → `to`.
    pub(crate) fn reveal_leading_edge(&mut self, from: Position, to: Position) {
        let radius = self.config.reveal_radius as i32;
        let dx = (to.x - from.x).signum();
        let dy = (to.y - from.y).signum();

        let mut found = Vec::new();
        if dx != 0 {
            found.extend(self.terrain.discover_area(
                to.offset(dx * radius, -radius),
                to.offset(dx * radius, radius),
            ));
        }
        if dy != 0 {
            found.extend(self.terrain.discover_area(
                to.offset(-radius, dy * radius),
                to.offset(radius, dy * radius),
            ));
        }
        self.record_discoveries(found);
    }

    fn record_discoveries(&mut self, found: Vec<(ResourceKind, Position)>) {
        let found: Vec<_> = found
            .into_iter()
            .filter(|(kind, position)| self.resource_map.record(*kind, *position))
            .collect();
        if found.is_empty() {
            return;
        }
        debug!(count = found.len(), "resources discovered");
        self.publish(ResourceEvent::Discovered { found });
    }

    /// Uniformly random in-bounds tile.
    pub(crate) fn random_tile(&mut self) -> Position {
        let dimensions = self.map.dimensions();
        let x = self.rng.random_range(0..dimensions.width.max(1)) as i32;
        let y = self.rng.random_range(0..dimensions.height.max(1)) as i32;
        Position::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{MapOracleImpl, RecipeOracleImpl};
    use game_core::InitialDeposit;

    fn world(map: MapOracleImpl) -> World {
        let start = map.start_position();
        World::new(
            GameConfig::default(),
            Arc::new(map),
            Arc::new(RecipeOracleImpl::standard()),
            start,
            7,
            EventBus::new(),
        )
    }

    #[test]
    fn home_area_starts_discovered() {
        let world = world(MapOracleImpl::test_map(16, 16));
        assert_eq!(world.terrain().discovered_count(), 25);
        assert!(world.terrain().is_discovered(Position::new(6, 6)));
        assert!(!world.terrain().is_discovered(Position::new(7, 7)));
    }

    #[test]
    fn leading_edge_reveal_records_resources() {
        let map = MapOracleImpl::test_map(16, 16).with_deposit(InitialDeposit::new(
            Position::new(9, 5),
            ResourceKind::Coal,
            3,
        ));
        let mut world = world(map);
        assert!(!world.resource_map().has_found(ResourceKind::Coal));

        world.reveal_leading_edge(Position::new(7, 4), Position::new(8, 4));

        assert!(world.resource_map().has_found(ResourceKind::Coal));
        assert!(world.terrain().is_discovered(Position::new(9, 3)));
        assert!(!world.terrain().is_discovered(Position::new(9, 2)));
    }

    #[test]
    fn nearest_free_resource_skips_claimed_units() {
        let map = MapOracleImpl::test_map(16, 16)
            .with_deposit(InitialDeposit::new(Position::new(5, 5), ResourceKind::Tree, 1))
            .with_deposit(InitialDeposit::new(Position::new(6, 6), ResourceKind::Tree, 1));
        let mut world = world(map);
        let home = world.start_position();

        assert_eq!(
            world.nearest_free_resource(ResourceKind::Tree, home),
            Some(Position::new(5, 5))
        );
        world.terrain.occupy_resource(Position::new(5, 5), ResourceKind::Tree);
        assert_eq!(
            world.nearest_free_resource(ResourceKind::Tree, home),
            Some(Position::new(6, 6))
        );

        world.collect_resource(Position::new(5, 5), ResourceKind::Tree);
        assert_eq!(world.resource_map().count(ResourceKind::Tree), 1);
    }
}
