//! Everything the agent can plan for: units, structures, resources and
//! exploration targets.

use core::fmt;

/// Mobile entity types.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum UnitKind {
    Worker,
    Explorer,
    Artisan,
    Soldier,
}

/// Immobile entity types placed on buildable tiles.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StructureKind {
    Camp,
    Smithy,
    Smelter,
    Refinery,
    Encampment,
}

/// Gatherable resource types found under the fog.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ResourceKind {
    WildTree,
    Tree,
    Coal,
    IronOre,
}

/// Trade an artisan is assigned to.
///
/// `Free` artisans have no assignment and can be claimed by any structure.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Profession {
    #[default]
    Free,
    Builder,
    Smith,
    Smelter,
    Refiner,
    Trainer,
}

/// Coarse grouping of products used by the planner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ProductCategory {
    Unit,
    Structure,
    Resource,
    Exploration,
}

/// A concrete product: a category together with its type.
///
/// `Exploration(kind)` is satisfied once a deposit of `kind` has been found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Product {
    Unit(UnitKind),
    Structure(StructureKind),
    Resource(ResourceKind),
    Exploration(ResourceKind),
}

impl Product {
    pub const fn category(self) -> ProductCategory {
        match self {
            Product::Unit(_) => ProductCategory::Unit,
            Product::Structure(_) => ProductCategory::Structure,
            Product::Resource(_) => ProductCategory::Resource,
            Product::Exploration(_) => ProductCategory::Exploration,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Product::Unit(kind) => write!(f, "unit:{kind}"),
            Product::Structure(kind) => write!(f, "structure:{kind}"),
            Product::Resource(kind) => write!(f, "resource:{kind}"),
            Product::Exploration(kind) => write!(f, "exploration:{kind}"),
        }
    }
}

impl From<UnitKind> for Product {
    fn from(kind: UnitKind) -> Self {
        Product::Unit(kind)
    }
}

impl From<StructureKind> for Product {
    fn from(kind: StructureKind) -> Self {
        Product::Structure(kind)
    }
}

impl From<ResourceKind> for Product {
    fn from(kind: ResourceKind) -> Self {
        Product::Resource(kind)
    }
}

/// A planner work item: reach `amount` of `product`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    pub product: Product,
    pub amount: u32,
}

impl Task {
    pub fn new(product: impl Into<Product>, amount: u32) -> Self {
        Self {
            product: product.into(),
            amount,
        }
    }

    pub const fn category(&self) -> ProductCategory {
        self.product.category()
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.product, self.amount)
    }
}
