//! Domain state shared by the planner and the entity behaviors.
//!
//! Identifiers, products and the mutable world layer (fog and resource
//! deposits) live here. Ownership of entities themselves belongs to the
//! runtime agent.
mod common;
mod flags;
mod product;
mod world;

pub use common::{EntityId, Position};
pub use flags::EntityFlags;
pub use product::{
    Product, ProductCategory, Profession, ResourceKind, StructureKind, Task, UnitKind,
};
pub use world::{DepositSlots, ResourceDeposit, WorldMap};
