use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::env::{FogFilter, InitialDeposit, MapDimensions, MapOracle};

use super::{Position, ResourceKind};

pub type DepositSlots = ArrayVec<ResourceDeposit, { GameConfig::MAX_DEPOSITS_PER_TILE }>;

/// A stack of identical resource units lying on one tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceDeposit {
    pub kind: ResourceKind,
    pub amount: u32,
    /// Units currently claimed by a gatherer.
    pub occupied: u32,
}

impl ResourceDeposit {
    pub const fn new(kind: ResourceKind, amount: u32) -> Self {
        Self {
            kind,
            amount,
            occupied: 0,
        }
    }

    pub const fn free(&self) -> u32 {
        self.amount.saturating_sub(self.occupied)
    }
}

/// Mutable world layer: fog of war and resource deposits.
///
/// Static terrain stays behind [`MapOracle`]; this type tracks what the agent
/// has discovered and which resource units are claimed. The discovered set is
/// shared copy-on-write with [`FogFilter`]s handed to background searches.
#[derive(Clone, Debug, Default)]
pub struct WorldMap {
    dimensions: MapDimensions,
    discovered: Arc<BTreeSet<Position>>,
    deposits: BTreeMap<Position, DepositSlots>,
}

impl WorldMap {
    pub fn new(dimensions: MapDimensions) -> Self {
        Self {
            dimensions,
            discovered: Arc::default(),
            deposits: BTreeMap::new(),
        }
    }

    /// Builds the world layer from a map oracle's initial deposits.
    pub fn from_oracle<M>(map: &M) -> Self
    where
        M: MapOracle + ?Sized,
    {
        let mut world = Self::new(map.dimensions());
        for InitialDeposit {
            position,
            kind,
            amount,
        } in map.initial_deposits()
        {
            world.add_deposit(position, kind, amount);
        }
        world
    }

    pub fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    /// Adds `amount` units of `kind` on `position`, merging with an existing
    /// stack of the same kind. Returns `false` when the tile has no free slot.
    pub fn add_deposit(&mut self, position: Position, kind: ResourceKind, amount: u32) -> bool {
        if amount == 0 || !self.dimensions.contains(position) {
            return false;
        }
        let slots = self.deposits.entry(position).or_default();
        if let Some(existing) = slots.iter_mut().find(|deposit| deposit.kind == kind) {
            existing.amount += amount;
            return true;
        }
        slots.try_push(ResourceDeposit::new(kind, amount)).is_ok()
    }

    pub fn deposits_at(&self, position: Position) -> &[ResourceDeposit] {
        self.deposits
            .get(&position)
            .map(|slots| slots.as_slice())
            .unwrap_or_default()
    }

    pub fn has_deposit(&self, position: Position) -> bool {
        self.deposits.contains_key(&position)
    }

    pub fn deposits(&self) -> impl Iterator<Item = (Position, &ResourceDeposit)> {
        self.deposits
            .iter()
            .flat_map(|(position, slots)| slots.iter().map(move |deposit| (*position, deposit)))
    }

    /// Whether `position` holds at least one unclaimed unit of `kind`.
    pub fn has_free_resource(&self, position: Position, kind: ResourceKind) -> bool {
        self.deposits_at(position)
            .iter()
            .any(|deposit| deposit.kind == kind && deposit.free() > 0)
    }

    /// Claims one unit of `kind` on `position`.
    pub fn occupy_resource(&mut self, position: Position, kind: ResourceKind) -> bool {
        match self.deposit_mut(position, kind) {
            Some(deposit) if deposit.free() > 0 => {
                deposit.occupied += 1;
                true
            }
            _ => false,
        }
    }

    /// Releases a claim without consuming the unit.
    pub fn release_resource(&mut self, position: Position, kind: ResourceKind) -> bool {
        match self.deposit_mut(position, kind) {
            Some(deposit) if deposit.occupied > 0 => {
                deposit.occupied -= 1;
                true
            }
            _ => false,
        }
    }

    /// Consumes one claimed unit of `kind`, releasing the claim.
    ///
    /// Exhausted stacks are removed from the tile.
    pub fn deduct_resource(&mut self, position: Position, kind: ResourceKind) -> bool {
        let Some(slots) = self.deposits.get_mut(&position) else {
            return false;
        };
        let Some(index) = slots.iter().position(|deposit| deposit.kind == kind) else {
            return false;
        };
        let deposit = &mut slots[index];
        if deposit.occupied == 0 {
            return false;
        }
        deposit.occupied -= 1;
        deposit.amount -= 1;
        if deposit.amount == 0 {
            slots.remove(index);
            if slots.is_empty() {
                self.deposits.remove(&position);
            }
        }
        true
    }

    pub fn is_discovered(&self, position: Position) -> bool {
        self.discovered.contains(&position)
    }

    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    /// Lifts the fog on the inclusive rectangle `start..=stop`, clipped to the
    /// map, and returns the deposits found on newly revealed tiles.
    pub fn discover_area(&mut self, start: Position, stop: Position) -> Vec<(ResourceKind, Position)> {
        let (min_x, max_x) = (start.x.min(stop.x), start.x.max(stop.x));
        let (min_y, max_y) = (start.y.min(stop.y), start.y.max(stop.y));

        let mut revealed = Vec::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let position = Position::new(x, y);
                if !self.dimensions.contains(position) || self.is_discovered(position) {
                    continue;
                }
                Arc::make_mut(&mut self.discovered).insert(position);
                revealed.extend(
                    self.deposits_at(position)
                        .iter()
                        .map(|deposit| (deposit.kind, position)),
                );
            }
        }
        revealed
    }

    /// Lifts the fog in a square of `radius` around `center`.
    pub fn discover_around(&mut self, center: Position, radius: i32) -> Vec<(ResourceKind, Position)> {
        self.discover_area(
            center.offset(-radius, -radius),
            center.offset(radius, radius),
        )
    }

    /// Snapshot of the discovered tiles for fog-restricted searches.
    pub fn fog_filter(&self) -> FogFilter {
        FogFilter::new(Arc::clone(&self.discovered))
    }

    fn deposit_mut(&mut self, position: Position, kind: ResourceKind) -> Option<&mut ResourceDeposit> {
        self.deposits
            .get_mut(&position)?
            .iter_mut()
            .find(|deposit| deposit.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> WorldMap {
        let mut world = WorldMap::new(MapDimensions::new(8, 8));
        world.add_deposit(Position::new(3, 3), ResourceKind::Tree, 2);
        world
    }

    #[test]
    fn occupied_units_are_not_free() {
        let mut world = world();
        let tile = Position::new(3, 3);

        assert!(world.occupy_resource(tile, ResourceKind::Tree));
        assert!(world.occupy_resource(tile, ResourceKind::Tree));
        assert!(!world.has_free_resource(tile, ResourceKind::Tree));
        assert!(!world.occupy_resource(tile, ResourceKind::Tree));

        assert!(world.release_resource(tile, ResourceKind::Tree));
        assert!(world.has_free_resource(tile, ResourceKind::Tree));
    }

    #[test]
    fn deduct_consumes_claim_and_clears_exhausted_tile() {
        let mut world = world();
        let tile = Position::new(3, 3);

        assert!(!world.deduct_resource(tile, ResourceKind::Tree));

        world.occupy_resource(tile, ResourceKind::Tree);
        assert!(world.deduct_resource(tile, ResourceKind::Tree));
        assert_eq!(world.deposits_at(tile)[0].amount, 1);
        assert_eq!(world.deposits_at(tile)[0].occupied, 0);

        world.occupy_resource(tile, ResourceKind::Tree);
        assert!(world.deduct_resource(tile, ResourceKind::Tree));
        assert!(!world.has_deposit(tile));
    }

    #[test]
    fn discover_area_reports_only_new_tiles() {
        let mut world = world();

        let first = world.discover_around(Position::new(2, 2), 1);
        assert_eq!(first, vec![(ResourceKind::Tree, Position::new(3, 3))]);
        assert_eq!(world.discovered_count(), 9);

        let again = world.discover_around(Position::new(3, 3), 1);
        assert!(again.is_empty());
        assert_eq!(world.discovered_count(), 14);
    }

    #[test]
    fn discover_area_clips_to_map() {
        let mut world = world();
        world.discover_around(Position::ORIGIN, 1);
        assert_eq!(world.discovered_count(), 4);
    }

    #[test]
    fn fog_filter_is_a_snapshot() {
        let mut world = world();
        world.discover_around(Position::new(1, 1), 0);
        let filter = world.fog_filter();

        world.discover_around(Position::new(5, 5), 0);

        assert!(filter.allows(Position::new(1, 1)));
        assert!(!filter.allows(Position::new(5, 5)));
        assert!(world.fog_filter().allows(Position::new(5, 5)));
    }
}
