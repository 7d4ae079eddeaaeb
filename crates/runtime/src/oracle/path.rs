//! Reference [`PathSearch`] implementation: 8-neighbour A* over the static
//! terrain.
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

use game_core::{FogFilter, MapOracle, Path, PathSearch, Position};

/// Fixed-point scale applied to terrain movement costs.
const COST_SCALE: f32 = 10.0;

/// A* search using terrain movement costs as edge weights.
///
/// Leaving a tile costs that tile's straight or diagonal movement time, the
/// same threshold walkers use. Diagonal steps may not cut corners past
/// impassable tiles.
pub struct AStarSearch {
    map: Arc<dyn MapOracle>,
}

impl AStarSearch {
    pub fn new(map: Arc<dyn MapOracle>) -> Self {
        Self { map }
    }

    fn index(&self, position: Position) -> usize {
        let width = self.map.dimensions().width as usize;
        position.y as usize * width + position.x as usize
    }

    fn position(&self, index: usize) -> Position {
        let width = self.map.dimensions().width as usize;
        Position::new((index % width) as i32, (index / width) as i32)
    }

    fn enterable(&self, position: Position, filter: Option<&FogFilter>) -> bool {
        self.map.is_passable(position) && filter.is_none_or(|filter| filter.allows(position))
    }

    fn step_cost(&self, from: Position, to: Position) -> Option<i32> {
        if from.is_diagonal_step(to)
            && !(self.map.is_passable(Position::new(to.x, from.y))
                && self.map.is_passable(Position::new(from.x, to.y)))
        {
            return None;
        }
        let cost = self.map.tile(from)?.movement_cost(from, to);
        cost.is_finite().then(|| (cost * COST_SCALE).round() as i32)
    }

    /// Octile distance at the cheapest terrain cost.
    fn heuristic(from: Position, to: Position) -> i32 {
        let dx = (from.x - to.x).abs();
        let dy = (from.y - to.y).abs();
        let straight = COST_SCALE as i32;
        let diagonal = (COST_SCALE * core::f32::consts::SQRT_2).round() as i32;
        straight * (dx + dy) + (diagonal - 2 * straight) * dx.min(dy)
    }
}

impl PathSearch for AStarSearch {
    fn search(&self, start: Position, goal: Position, filter: Option<&FogFilter>) -> Option<Path> {
        if !self.map.contains(start) || !self.map.contains(goal) {
            return None;
        }
        if start == goal {
            return Some(Path::default());
        }
        if !self.enterable(goal, filter) {
            return None;
        }

        let area = self.map.dimensions().area();
        let mut dist = vec![i32::MAX; area];
        let mut prev: Vec<Option<usize>> = vec![None; area];
        let start_index = self.index(start);
        let goal_index = self.index(goal);
        dist[start_index] = 0;

        let mut heap: BinaryHeap<Reverse<(i32, usize)>> = BinaryHeap::new();
        heap.push(Reverse((Self::heuristic(start, goal), start_index)));

        while let Some(Reverse((estimate, index))) = heap.pop() {
            if index == goal_index {
                break;
            }
            let current = self.position(index);
            let cost = dist[index];
            if estimate - Self::heuristic(current, goal) > cost {
                continue;
            }

            for neighbour in current.neighbours() {
                if !self.map.contains(neighbour) || !self.enterable(neighbour, filter) {
                    continue;
                }
                let Some(step_cost) = self.step_cost(current, neighbour) else {
                    continue;
                };
                let next = self.index(neighbour);
                let new_cost = cost.saturating_add(step_cost);
                if new_cost < dist[next] {
                    dist[next] = new_cost;
                    prev[next] = Some(index);
                    heap.push(Reverse((
                        new_cost + Self::heuristic(neighbour, goal),
                        next,
                    )));
                }
            }
        }

        if dist[goal_index] == i32::MAX {
            return None;
        }

        let mut steps = Vec::new();
        let mut cursor = goal_index;
        while cursor != start_index {
            steps.push(self.position(cursor));
            cursor = prev[cursor]?;
        }
        steps.reverse();
        Some(Path::new(steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::MapOracleImpl;
    use game_core::{TerrainKind, WorldMap};

    fn search(map: MapOracleImpl) -> AStarSearch {
        AStarSearch::new(Arc::new(map))
    }

    #[test]
    fn open_ground_walks_the_diagonal() {
        let path = search(MapOracleImpl::test_map(8, 8))
            .search(Position::new(0, 0), Position::new(3, 3), None)
            .expect("reachable");

        assert_eq!(
            path.steps().copied().collect::<Vec<_>>(),
            [Position::new(1, 1), Position::new(2, 2), Position::new(3, 3)]
        );
    }

    #[test]
    fn start_equals_goal_yields_empty_path() {
        let path = search(MapOracleImpl::test_map(4, 4))
            .search(Position::new(1, 1), Position::new(1, 1), None)
            .expect("trivial");
        assert!(path.is_empty());
    }

    #[test]
    fn walls_are_routed_around() {
        let mut map = MapOracleImpl::test_map(5, 5);
        for y in 0..4 {
            map = map.with_terrain(Position::new(2, y), TerrainKind::Water);
        }
        let path = search(map)
            .search(Position::new(0, 0), Position::new(4, 0), None)
            .expect("gap at the bottom");

        assert_eq!(path.destination(), Some(Position::new(4, 0)));
        assert!(path.steps().any(|step| step.y == 4));
        assert!(path.steps().all(|step| step.x != 2 || step.y == 4));
    }

    #[test]
    fn impassable_goal_is_unreachable() {
        let map = MapOracleImpl::test_map(5, 5).with_terrain(Position::new(3, 3), TerrainKind::Mountain);
        assert!(search(map)
            .search(Position::new(0, 0), Position::new(3, 3), None)
            .is_none());
    }

    #[test]
    fn fog_filter_restricts_the_search() {
        let map = MapOracleImpl::test_map(6, 6);
        let mut world = WorldMap::new(map.dimensions());
        world.discover_around(Position::new(1, 1), 1);
        let search = search(map);

        let filter = world.fog_filter();
        assert!(search
            .search(Position::new(1, 1), Position::new(2, 2), Some(&filter))
            .is_some());
        assert!(search
            .search(Position::new(1, 1), Position::new(4, 4), Some(&filter))
            .is_none());
        assert!(search
            .search(Position::new(1, 1), Position::new(4, 4), None)
            .is_some());
    }

    #[test]
    fn swamp_is_avoided_when_grass_is_cheaper() {
        let mut map = MapOracleImpl::test_map(5, 3);
        for x in 1..4 {
            map = map.with_terrain(Position::new(x, 1), TerrainKind::Swamp);
        }
        let path = search(map)
            .search(Position::new(0, 1), Position::new(4, 1), None)
            .expect("reachable");

        assert!(path.steps().all(|step| step.y != 1 || step.x == 4));
    }
}
