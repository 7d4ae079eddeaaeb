//! Domain types and collaborator traits for the player AI.
//!
//! `game-core` defines the vocabulary shared by the planner and the entity
//! behaviors (products, tasks, recipes, positions), the mutable world layer
//! ([`WorldMap`]) and the oracle traits through which the runtime reaches
//! static data and the path search service.
pub mod config;
pub mod env;
pub mod error;
pub mod state;

pub use config::GameConfig;
pub use env::{
    FogFilter, InitialDeposit, MapDimensions, MapOracle, Path, PathSearch, Recipe, RecipeOracle,
    StaticTile, TerrainKind,
};
pub use error::{ErrorSeverity, GameError, PlannerError};
pub use state::{
    DepositSlots, EntityFlags, EntityId, Position, Product, ProductCategory, Profession,
    ResourceDeposit, ResourceKind, StructureKind, Task, UnitKind, WorldMap,
};
