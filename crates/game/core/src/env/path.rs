use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use crate::state::Position;

/// Ordered steps from (but excluding) the start tile to the goal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    steps: VecDeque<Position>,
}

impl Path {
    pub fn new(steps: impl IntoIterator<Item = Position>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    /// The tile the walker should move to next.
    pub fn next_step(&self) -> Option<Position> {
        self.steps.front().copied()
    }

    /// Consumes the next step.
    pub fn advance(&mut self) -> Option<Position> {
        self.steps.pop_front()
    }

    pub fn destination(&self) -> Option<Position> {
        self.steps.back().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> impl Iterator<Item = &Position> {
        self.steps.iter()
    }
}

/// Restricts a search to the tiles the agent has discovered.
#[derive(Clone, Debug, Default)]
pub struct FogFilter {
    discovered: Arc<BTreeSet<Position>>,
}

impl FogFilter {
    pub fn new(discovered: Arc<BTreeSet<Position>>) -> Self {
        Self { discovered }
    }

    pub fn allows(&self, position: Position) -> bool {
        self.discovered.contains(&position)
    }
}

/// Shortest-path service over the static map.
///
/// Implementations are called from background threads, so they must not
/// borrow agent state. With a filter, every visited tile must pass it; the
/// start tile is always allowed.
pub trait PathSearch: Send + Sync {
    fn search(&self, start: Position, goal: Position, filter: Option<&FogFilter>) -> Option<Path>;
}
