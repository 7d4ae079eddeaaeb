//! Map data loader.
//!
//! Loads terrain and the initial resource deposits from map RON files.

use std::collections::HashMap;
use std::path::Path;

use game_core::{InitialDeposit, MapDimensions, Position, StaticTile, TerrainKind};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// Map data structure for RON files.
#[derive(Debug, Clone, Deserialize)]
struct MapDataRon {
    dimensions: (u32, u32),
    #[serde(default)]
    start: Position,
    #[serde(default)]
    tiles: Vec<(i32, i32, TerrainKind)>, // (x, y, terrain)
    #[serde(default)]
    deposits: Vec<InitialDeposit>,
}

/// A fully expanded map: every in-bounds tile is present.
#[derive(Debug, Clone)]
pub struct MapData {
    pub dimensions: MapDimensions,
    pub start: Position,
    pub tiles: HashMap<Position, StaticTile>,
    pub deposits: Vec<InitialDeposit>,
}

/// Loader for map data from RON files.
pub struct MapLoader;

impl MapLoader {
    pub fn load(path: &Path) -> LoadResult<MapData> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<MapData> {
        let data: MapDataRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?;

        let dimensions = MapDimensions::new(data.dimensions.0, data.dimensions.1);
        if !dimensions.contains(data.start) {
            anyhow::bail!("start position {} is outside the map", data.start);
        }

        // Fill entire map with default Grass tiles first
        let mut tiles = HashMap::with_capacity(dimensions.area());
        for y in 0..dimensions.height {
            for x in 0..dimensions.width {
                let pos = Position::new(x as i32, y as i32);
                tiles.insert(pos, StaticTile::new(TerrainKind::Grass));
            }
        }

        // Then override with explicitly defined tiles
        for (x, y, terrain) in data.tiles {
            let pos = Position::new(x, y);
            if !dimensions.contains(pos) {
                anyhow::bail!("tile {} is outside the map", pos);
            }
            tiles.insert(pos, StaticTile::new(terrain));
        }

        Ok(MapData {
            dimensions,
            start: data.start,
            tiles,
            deposits: data.deposits,
        })
    }
}
