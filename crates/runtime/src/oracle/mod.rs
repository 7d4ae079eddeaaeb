//! Runtime implementations of the `game-core` collaborator traits.
//!
//! The static map, the production table and the path search are immutable for
//! the lifetime of a session and shared behind `Arc`s, so the pathfinding
//! bridge can hand the search to background threads. Mutable state (fog,
//! deposits, entities) lives in the agent.
mod map;
mod path;
mod recipes;

use std::path::Path;
use std::sync::Arc;

use game_content::ContentFactory;
use game_core::{MapOracle, PathSearch, Position, RecipeOracle};

use crate::api::Result;

pub use map::MapOracleImpl;
pub use path::AStarSearch;
pub use recipes::RecipeOracleImpl;

/// Bundles the collaborators a [`crate::PlayerAi`] is built from.
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) map: Arc<MapOracleImpl>,
    pub(crate) recipes: Arc<RecipeOracleImpl>,
    pub(crate) search: Arc<dyn PathSearch>,
}

impl OracleManager {
    pub fn new(
        map: Arc<MapOracleImpl>,
        recipes: Arc<RecipeOracleImpl>,
        search: Arc<dyn PathSearch>,
    ) -> Self {
        Self {
            map,
            recipes,
            search,
        }
    }

    /// Uses [`AStarSearch`] over `map` as the path service.
    pub fn with_astar(map: MapOracleImpl, recipes: RecipeOracleImpl) -> Self {
        let map = Arc::new(map);
        let search = Arc::new(AStarSearch::new(Arc::clone(&map) as Arc<dyn MapOracle>));
        Self::new(map, Arc::new(recipes), search)
    }

    /// Open test map with the standard production table.
    pub fn test_map(width: u32, height: u32) -> Self {
        Self::with_astar(
            MapOracleImpl::test_map(width, height),
            RecipeOracleImpl::standard(),
        )
    }

    /// Loads `recipes.ron` and `maps/{map_name}.ron` from `data_dir`.
    pub fn load(data_dir: impl AsRef<Path>, map_name: &str) -> Result<Self> {
        let factory = ContentFactory::new(data_dir.as_ref());
        let recipes = factory.load_recipes()?;
        let map = factory.load_map(map_name)?;

        tracing::info!(
            data_dir = %data_dir.as_ref().display(),
            map = map_name,
            recipes = recipes.len(),
            "Loaded oracles"
        );

        Ok(Self::with_astar(
            MapOracleImpl::from(map),
            RecipeOracleImpl::from(recipes),
        ))
    }

    pub fn map(&self) -> Arc<dyn MapOracle> {
        Arc::clone(&self.map) as Arc<dyn MapOracle>
    }

    pub fn recipes(&self) -> Arc<dyn RecipeOracle> {
        Arc::clone(&self.recipes) as Arc<dyn RecipeOracle>
    }

    pub fn search(&self) -> Arc<dyn PathSearch> {
        Arc::clone(&self.search)
    }

    /// Home position declared by the map.
    pub fn start_position(&self) -> Position {
        self.map.start_position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Product, StructureKind};

    #[test]
    fn bundled_meadow_loads() {
        let oracles = OracleManager::load(ContentFactory::bundled().data_dir(), "meadow")
            .expect("bundled content loads");

        assert_eq!(oracles.start_position(), Position::new(4, 4));
        assert!(!oracles.map().initial_deposits().is_empty());
        assert!(
            oracles
                .recipes()
                .recipe(Product::Structure(StructureKind::Camp))
                .is_some()
        );
    }

    #[test]
    fn missing_map_is_a_content_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(OracleManager::load(dir.path(), "nowhere").is_err());
    }
}
