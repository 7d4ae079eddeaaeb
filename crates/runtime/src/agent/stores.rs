//! Agent-owned resource bookkeeping.
use std::collections::{BTreeMap, BTreeSet};

use game_core::{Position, ResourceKind};

/// Units of each resource type delivered home.
///
/// Counts never go negative: a withdrawal either takes the full amount or
/// nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceTally {
    counts: BTreeMap<ResourceKind, u32>,
}

impl ResourceTally {
    /// Adds `amount` units of `kind` and returns the new count.
    pub fn add(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        let count = self.counts.entry(kind).or_default();
        *count += amount;
        *count
    }

    pub fn count(&self, kind: ResourceKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or_default()
    }

    pub fn has(&self, kind: ResourceKind, amount: u32) -> bool {
        self.count(kind) >= amount
    }

    /// Removes `amount` units of `kind` if that many are held.
    pub fn withdraw(&mut self, kind: ResourceKind, amount: u32) -> bool {
        match self.counts.get_mut(&kind) {
            Some(count) if *count >= amount => {
                *count -= amount;
                true
            }
            _ => amount == 0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        self.counts.iter().map(|(kind, count)| (*kind, *count))
    }
}

/// Deposits the agent has seen, by resource type.
#[derive(Clone, Debug, Default)]
pub struct ResourceMap {
    known: BTreeMap<ResourceKind, BTreeSet<Position>>,
}

impl ResourceMap {
    /// Returns `true` when the position was not known yet.
    pub fn record(&mut self, kind: ResourceKind, position: Position) -> bool {
        self.known.entry(kind).or_default().insert(position)
    }

    pub fn forget(&mut self, kind: ResourceKind, position: Position) {
        if let Some(positions) = self.known.get_mut(&kind) {
            positions.remove(&position);
            if positions.is_empty() {
                self.known.remove(&kind);
            }
        }
    }

    pub fn has_found(&self, kind: ResourceKind) -> bool {
        self.known.contains_key(&kind)
    }

    pub fn positions(&self, kind: ResourceKind) -> impl Iterator<Item = Position> + '_ {
        self.known.get(&kind).into_iter().flatten().copied()
    }

    pub fn count(&self, kind: ResourceKind) -> usize {
        self.known.get(&kind).map_or(0, BTreeSet::len)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        self.known.keys().copied()
    }
}
