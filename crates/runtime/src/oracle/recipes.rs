//! Production table served through [`game_core::RecipeOracle`].
use std::collections::HashMap;

use game_core::{
    Product, Profession, Recipe, RecipeOracle, ResourceKind, StructureKind, UnitKind,
};

/// RecipeOracle implementation backed by a product map.
#[derive(Clone, Debug, Default)]
pub struct RecipeOracleImpl {
    recipes: HashMap<Product, Recipe>,
}

impl RecipeOracleImpl {
    pub fn new(recipes: HashMap<Product, Recipe>) -> Self {
        Self { recipes }
    }

    /// The stock production chain: camps train workers, workers become
    /// explorers and artisans, staffed workshops turn lumber and ore into
    /// soldiers.
    pub fn standard() -> Self {
        use Product::{Resource, Structure, Unit};

        let recipes = HashMap::from([
            (
                Unit(UnitKind::Worker),
                Recipe::new()
                    .requires(StructureKind::Camp, 1)
                    .production_time(2.0),
            ),
            (
                Unit(UnitKind::Explorer),
                Recipe::new()
                    .requires(UnitKind::Worker, 1)
                    .production_time(1.0)
                    .move_factor(1.5),
            ),
            (
                Unit(UnitKind::Artisan),
                Recipe::new()
                    .requires(UnitKind::Worker, 1)
                    .production_time(3.0),
            ),
            (
                Unit(UnitKind::Soldier),
                Recipe::new()
                    .requires(StructureKind::Encampment, 1)
                    .requires(UnitKind::Worker, 1)
                    .requires(ResourceKind::IronOre, 1)
                    .production_time(4.0),
            ),
            (
                Structure(StructureKind::Camp),
                Recipe::new().production_time(10.0),
            ),
            (
                Structure(StructureKind::Smithy),
                workshop()
                    .requires(ResourceKind::Coal, 5)
                    .staffed_by(Profession::Smith),
            ),
            (
                Structure(StructureKind::Smelter),
                workshop().staffed_by(Profession::Smelter),
            ),
            (
                Structure(StructureKind::Refinery),
                workshop().staffed_by(Profession::Refiner),
            ),
            (
                Structure(StructureKind::Encampment),
                workshop().staffed_by(Profession::Trainer),
            ),
            (Resource(ResourceKind::WildTree), resource(ResourceKind::WildTree, 2.0)),
            (Resource(ResourceKind::Tree), resource(ResourceKind::Tree, 3.0)),
            (Resource(ResourceKind::Coal), resource(ResourceKind::Coal, 4.0)),
            (Resource(ResourceKind::IronOre), resource(ResourceKind::IronOre, 5.0)),
        ]);

        Self::new(recipes)
    }

    /// Adds or replaces the recipe of `product`.
    #[must_use]
    pub fn with_recipe(mut self, product: impl Into<Product>, recipe: Recipe) -> Self {
        self.recipes.insert(product.into(), recipe);
        self
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

fn workshop() -> Recipe {
    Recipe::new()
        .requires(ResourceKind::Tree, 10)
        .production_time(20.0)
        .built_by_builder()
}

fn resource(kind: ResourceKind, gather_time: f32) -> Recipe {
    Recipe::new()
        .requires(Product::Exploration(kind), 1)
        .gather_time(gather_time)
}

impl From<HashMap<Product, Recipe>> for RecipeOracleImpl {
    fn from(recipes: HashMap<Product, Recipe>) -> Self {
        Self::new(recipes)
    }
}

impl RecipeOracle for RecipeOracleImpl {
    fn recipe(&self, product: Product) -> Option<&Recipe> {
        self.recipes.get(&product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_matches_bundled_content() {
        let bundled = game_content::RecipeLoader::builtin().expect("bundled recipes parse");
        let standard = RecipeOracleImpl::standard();

        assert_eq!(standard.len(), bundled.len());
        for (product, recipe) in &bundled {
            assert_eq!(standard.recipe(*product), Some(recipe), "{product}");
        }
    }

    #[test]
    fn workshops_need_a_builder_and_staff() {
        let recipes = RecipeOracleImpl::standard();
        let smithy = recipes
            .recipe(Product::Structure(StructureKind::Smithy))
            .expect("smithy recipe");

        assert!(smithy.builder_required);
        assert_eq!(smithy.staffed_by, Some(Profession::Smith));
        assert_eq!(
            recipes.requirements(Product::Structure(StructureKind::Smithy)).len(),
            2
        );
    }

    #[test]
    fn unknown_products_fall_back_to_defaults() {
        let recipes = RecipeOracleImpl::default();
        let product = Product::Unit(UnitKind::Soldier);

        assert!(recipes.requirements(product).is_empty());
        assert_eq!(recipes.move_factor(product), Recipe::DEFAULT_MOVE_FACTOR);
        assert_eq!(recipes.production_time(product), 0.0);
    }
}
