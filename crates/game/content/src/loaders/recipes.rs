//! Production recipe loader.

use std::collections::HashMap;
use std::path::Path;

use game_core::{Product, Recipe};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// One entry of a recipe RON file.
#[derive(Debug, Clone, Deserialize)]
struct RecipeEntry {
    product: Product,
    recipe: Recipe,
}

/// Loader for production recipes from RON files.
///
/// File format: a list of `(product: ..., recipe: (...))` entries. Later
/// entries for the same product replace earlier ones.
pub struct RecipeLoader;

impl RecipeLoader {
    pub fn load(path: &Path) -> LoadResult<HashMap<Product, Recipe>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse recipes at {}: {}", path.display(), e))
    }

    /// Loads the recipe table shipped with the crate.
    pub fn builtin() -> LoadResult<HashMap<Product, Recipe>> {
        Self::parse(include_str!("../../data/recipes.ron"))
    }

    pub fn parse(content: &str) -> LoadResult<HashMap<Product, Recipe>> {
        let entries: Vec<RecipeEntry> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse recipe RON: {}", e))?;

        Ok(entries
            .into_iter()
            .map(|entry| (entry.product, entry.recipe))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Profession, ResourceKind, StructureKind, Task, UnitKind};

    #[test]
    fn builtin_table_covers_every_buildable_product() {
        let recipes = RecipeLoader::builtin().expect("Failed to load builtin recipes");

        let worker = &recipes[&Product::Unit(UnitKind::Worker)];
        assert_eq!(
            worker.requirements,
            vec![Task::new(StructureKind::Camp, 1)]
        );

        let smithy = &recipes[&Product::Structure(StructureKind::Smithy)];
        assert!(smithy.builder_required);
        assert_eq!(smithy.staffed_by, Some(Profession::Smith));

        let coal = &recipes[&Product::Resource(ResourceKind::Coal)];
        assert_eq!(
            coal.requirements,
            vec![Task::new(Product::Exploration(ResourceKind::Coal), 1)]
        );
        assert!(coal.gather_time > 0.0);
    }

    #[test]
    fn omitted_fields_use_recipe_defaults() {
        let recipes = RecipeLoader::parse(
            "[(product: Unit(Explorer), recipe: (production_time: 4.0))]",
        )
        .unwrap();

        let explorer = &recipes[&Product::Unit(UnitKind::Explorer)];
        assert_eq!(explorer.production_time, 4.0);
        assert_eq!(explorer.move_factor, Recipe::DEFAULT_MOVE_FACTOR);
        assert!(explorer.requirements.is_empty());
        assert_eq!(explorer.staffed_by, None);
    }

    #[test]
    fn malformed_ron_is_rejected() {
        assert!(RecipeLoader::parse("[(product: Unit(Dragon))]").is_err());
    }
}
