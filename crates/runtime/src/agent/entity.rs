//! Agent-owned entities and their container.
use std::collections::BTreeMap;
use std::fmt;

use game_core::{
    EntityFlags, EntityId, Path, Position, Product, Profession, ResourceKind, StructureKind,
    UnitKind,
};
use serde::{Deserialize, Serialize};
use state_machine::StateMachine;

use crate::states::{EntityState, EntityStateKind};

/// Tagged entity type used for filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Unit(UnitKind),
    Structure(StructureKind),
}

impl EntityKind {
    /// Maps a producible product to the entity that embodies it.
    pub fn from_product(product: Product) -> Option<Self> {
        match product {
            Product::Unit(kind) => Some(EntityKind::Unit(kind)),
            Product::Structure(kind) => Some(EntityKind::Structure(kind)),
            Product::Resource(_) | Product::Exploration(_) => None,
        }
    }

    pub fn product(self) -> Product {
        match self {
            EntityKind::Unit(kind) => Product::Unit(kind),
            EntityKind::Structure(kind) => Product::Structure(kind),
        }
    }

    pub fn is_unit(self) -> bool {
        matches!(self, EntityKind::Unit(_))
    }

    pub fn is_structure(self) -> bool {
        matches!(self, EntityKind::Structure(_))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Unit(kind) => write!(f, "{kind}"),
            EntityKind::Structure(kind) => write!(f, "{kind}"),
        }
    }
}

/// A unit or structure owned by the agent.
///
/// The state machine is taken out while one of its hooks runs, so
/// [`Entity::state_kind`] is `None` only for the entity whose hook is
/// executing.
#[derive(Debug)]
pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) kind: EntityKind,
    pub(crate) location: Position,
    pub(crate) flags: EntityFlags,
    pub(crate) profession: Profession,
    pub(crate) move_factor: f32,
    pub(crate) move_progress: f32,
    pub(crate) path: Option<Path>,
    pub(crate) carried: Option<ResourceKind>,
    /// Structures locked for this entity's production; the first is the origin.
    pub(crate) locked_structures: Vec<EntityId>,
    /// Units locked for this entity's production, removed on spawn.
    pub(crate) consumed_units: Vec<EntityId>,
    pub(crate) artisan_required: Option<Profession>,
    /// Builder while under construction, staff once completed.
    pub(crate) artisan: Option<EntityId>,
    pub(crate) machine: Option<StateMachine<EntityState>>,
}

impl Entity {
    pub(crate) fn new(id: EntityId, kind: EntityKind, location: Position, initial: EntityState) -> Self {
        Self {
            id,
            kind,
            location,
            flags: EntityFlags::empty(),
            profession: Profession::Free,
            move_factor: 1.0,
            move_progress: 0.0,
            path: None,
            carried: None,
            locked_structures: Vec::new(),
            consumed_units: Vec::new(),
            artisan_required: None,
            artisan: None,
            machine: Some(StateMachine::new(initial)),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn location(&self) -> Position {
        self.location
    }

    pub fn is_idle(&self) -> bool {
        self.flags.contains(EntityFlags::IDLE)
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(EntityFlags::VISIBLE)
    }

    pub fn is_unit_of(&self, kind: UnitKind) -> bool {
        self.kind == EntityKind::Unit(kind)
    }

    pub fn is_structure_of(&self, kind: StructureKind) -> bool {
        self.kind == EntityKind::Structure(kind)
    }

    pub fn profession(&self) -> Profession {
        self.profession
    }

    pub fn carried(&self) -> Option<ResourceKind> {
        self.carried
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    pub fn artisan(&self) -> Option<EntityId> {
        self.artisan
    }

    pub fn artisan_required(&self) -> Option<Profession> {
        self.artisan_required
    }

    pub fn origin_structure(&self) -> Option<EntityId> {
        self.locked_structures.first().copied()
    }

    pub fn state(&self) -> Option<&EntityState> {
        self.machine.as_ref().map(StateMachine::current)
    }

    pub fn state_kind(&self) -> Option<EntityStateKind> {
        self.machine.as_ref().map(StateMachine::current_kind)
    }

    pub fn is_in_state(&self, kind: EntityStateKind) -> bool {
        self.state_kind() == Some(kind)
    }

    /// Transition count of the entity's machine.
    pub fn generation(&self) -> Option<u64> {
        self.machine.as_ref().map(StateMachine::generation)
    }

    /// Stops walking and forgets the remaining path.
    pub(crate) fn stop(&mut self) {
        self.path = None;
        self.move_progress = 0.0;
    }
}

/// Entities keyed by id in creation order.
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u32,
}

impl EntityStore {
    pub(crate) fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn insert(&mut self, entity: Entity) {
        self.entities.insert(entity.id, entity);
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn units(&self, kind: UnitKind) -> impl Iterator<Item = &Entity> {
        self.iter().filter(move |entity| entity.is_unit_of(kind))
    }

    pub fn structures(&self, kind: StructureKind) -> impl Iterator<Item = &Entity> {
        self.iter().filter(move |entity| entity.is_structure_of(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_never_reused() {
        let mut store = EntityStore::default();
        let first = store.allocate_id();
        store.insert(Entity::new(
            first,
            EntityKind::Unit(UnitKind::Worker),
            Position::ORIGIN,
            EntityState::Idle,
        ));
        store.remove(first);

        assert_ne!(store.allocate_id(), first);
        assert!(store.is_empty());
    }

    #[test]
    fn kind_filters_by_tag() {
        let mut store = EntityStore::default();
        for kind in [
            EntityKind::Unit(UnitKind::Worker),
            EntityKind::Unit(UnitKind::Explorer),
            EntityKind::Structure(StructureKind::Camp),
        ] {
            let id = store.allocate_id();
            store.insert(Entity::new(id, kind, Position::ORIGIN, EntityState::Locked));
        }

        assert_eq!(store.units(UnitKind::Worker).count(), 1);
        assert_eq!(store.structures(StructureKind::Camp).count(), 1);
        assert_eq!(store.units(UnitKind::Soldier).count(), 0);
        assert_eq!(
            EntityKind::from_product(Product::Structure(StructureKind::Camp)),
            Some(EntityKind::Structure(StructureKind::Camp))
        );
    }
}
