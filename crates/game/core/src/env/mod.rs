//! Traits describing read-only world data.
//!
//! Oracles expose static map geometry, production recipes and the path
//! search service. The runtime owns concrete implementations; the planner
//! and behaviors only see these traits.
mod map;
mod path;
mod recipes;

pub use map::{InitialDeposit, MapDimensions, MapOracle, StaticTile, TerrainKind};
pub use path::{FogFilter, Path, PathSearch};
pub use recipes::{Recipe, RecipeOracle};
