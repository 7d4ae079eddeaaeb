//! Static tile layout served through [`game_core::MapOracle`].
use game_content::MapData;
use game_core::{InitialDeposit, MapDimensions, MapOracle, Position, StaticTile, TerrainKind};
use std::collections::HashMap;

/// MapOracle implementation with static map data
///
/// Holds the terrain that never changes during a session. Fog and deposit
/// bookkeeping live in [`game_core::WorldMap`].
pub struct MapOracleImpl {
    dimensions: MapDimensions,
    tiles: HashMap<Position, StaticTile>,
    deposits: Vec<InitialDeposit>,
    start: Position,
}

impl MapOracleImpl {
    pub fn new(
        dimensions: MapDimensions,
        tiles: HashMap<Position, StaticTile>,
        deposits: Vec<InitialDeposit>,
        start: Position,
    ) -> Self {
        Self {
            dimensions,
            tiles,
            deposits,
            start,
        }
    }

    /// Creates an open grass map with the start position in the top-left
    /// quarter and no deposits.
    pub fn test_map(width: u32, height: u32) -> Self {
        let dimensions = MapDimensions::new(width, height);
        let mut tiles = HashMap::new();

        for x in 0..width as i32 {
            for y in 0..height as i32 {
                tiles.insert(Position::new(x, y), StaticTile::new(TerrainKind::Grass));
            }
        }

        let start = Position::new(width as i32 / 4, height as i32 / 4);
        Self::new(dimensions, tiles, Vec::new(), start)
    }

    /// Adds a deposit that exists when the session starts.
    #[must_use]
    pub fn with_deposit(mut self, deposit: InitialDeposit) -> Self {
        self.deposits.push(deposit);
        self
    }

    /// Replaces the terrain of a single tile.
    #[must_use]
    pub fn with_terrain(mut self, position: Position, terrain: TerrainKind) -> Self {
        if self.dimensions.contains(position) {
            self.tiles.insert(position, StaticTile::new(terrain));
        }
        self
    }

    /// Where the agent's home (delivery point) is.
    pub fn start_position(&self) -> Position {
        self.start
    }
}

impl From<MapData> for MapOracleImpl {
    fn from(data: MapData) -> Self {
        Self::new(data.dimensions, data.tiles, data.deposits, data.start)
    }
}

impl MapOracle for MapOracleImpl {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn tile(&self, position: Position) -> Option<StaticTile> {
        self.tiles.get(&position).copied()
    }

    fn initial_deposits(&self) -> Vec<InitialDeposit> {
        self.deposits.clone()
    }
}
