//! Data-driven content definitions and loaders.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Production recipes (data-driven via RON, with an embedded default table)
//! - Map layouts and initial resource deposits (data-driven via RON)
//! - Planner and behavior tunables (data-driven via TOML)
//!
//! Content is consumed by runtime oracles and never appears in agent state.
//! All loaders use game-core types directly with serde for RON/TOML deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LoadResult, MapData, MapLoader, RecipeLoader};
