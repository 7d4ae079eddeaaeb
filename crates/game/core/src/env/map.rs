use crate::state::{Position, ResourceKind};

/// Static map oracle exposing immutable layout information and the resource
/// deposits present when a session starts.
pub trait MapOracle: Send + Sync {
    fn dimensions(&self) -> MapDimensions;
    fn tile(&self, position: Position) -> Option<StaticTile>;

    /// Returns the deposits that exist when the scenario starts.
    fn initial_deposits(&self) -> Vec<InitialDeposit> {
        Vec::new()
    }

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }

    fn is_passable(&self, position: Position) -> bool {
        self.tile(position).is_some_and(StaticTile::is_passable)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Immutable descriptor for a tile in the static layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticTile {
    terrain: TerrainKind,
}

impl StaticTile {
    pub const fn new(terrain: TerrainKind) -> Self {
        Self { terrain }
    }

    pub fn terrain(self) -> TerrainKind {
        self.terrain
    }

    pub fn is_passable(self) -> bool {
        self.terrain.is_passable()
    }

    /// Time units needed to leave this tile orthogonally at move factor 1.
    pub fn movement_straight(self) -> f32 {
        self.terrain.movement_straight()
    }

    /// Time units needed to leave this tile diagonally at move factor 1.
    pub fn movement_diagonal(self) -> f32 {
        self.terrain.movement_diagonal()
    }

    /// Movement threshold for a single step from `from` to `to`.
    pub fn movement_cost(self, from: Position, to: Position) -> f32 {
        if from.is_diagonal_step(to) {
            self.movement_diagonal()
        } else {
            self.movement_straight()
        }
    }
}

/// Canonical terrain classes for static map tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TerrainKind {
    #[default]
    Grass,
    Forest,
    Swamp,
    Water,
    Mountain,
}

impl TerrainKind {
    pub fn is_passable(self) -> bool {
        !matches!(self, TerrainKind::Water | TerrainKind::Mountain)
    }

    pub fn movement_straight(self) -> f32 {
        match self {
            TerrainKind::Grass => 1.0,
            TerrainKind::Forest => 2.0,
            TerrainKind::Swamp => 3.0,
            TerrainKind::Water | TerrainKind::Mountain => f32::INFINITY,
        }
    }

    pub fn movement_diagonal(self) -> f32 {
        self.movement_straight() * core::f32::consts::SQRT_2
    }
}

/// Blueprint describing a resource stack that exists at session start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitialDeposit {
    pub position: Position,
    pub kind: ResourceKind,
    pub amount: u32,
}

impl InitialDeposit {
    pub const fn new(position: Position, kind: ResourceKind, amount: u32) -> Self {
        Self {
            position,
            kind,
            amount,
        }
    }
}
