//! Content factory for loading all content from a data directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use game_core::{GameConfig, Product, Recipe};

use crate::loaders::{ConfigLoader, LoadResult, MapData, MapLoader, RecipeLoader};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── recipes.ron
/// └── maps/
///     └── meadow.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data directory shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the recipe table from `recipes.ron`.
    pub fn load_recipes(&self) -> LoadResult<HashMap<Product, Recipe>> {
        RecipeLoader::load(&self.data_dir.join("recipes.ron"))
    }

    /// Load a map from `maps/{map_name}.ron`.
    pub fn load_map(&self, map_name: &str) -> LoadResult<MapData> {
        let path = self.data_dir.join("maps").join(format!("{}.ron", map_name));
        MapLoader::load(&path)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::StructureKind;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn bundled_content_loads() {
        let factory = ContentFactory::bundled();

        let config = factory.load_config().unwrap();
        assert_eq!(config, GameConfig::default());

        let recipes = factory.load_recipes().unwrap();
        assert!(recipes.contains_key(&Product::Structure(StructureKind::Camp)));

        let map = factory.load_map("meadow").unwrap();
        assert!(map.dimensions.contains(map.start));
        assert!(!map.deposits.is_empty());
    }
}
