//! Client configuration loaded from the environment.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use game_content::ContentFactory;
use game_core::{Product, ResourceKind, StructureKind, Task, UnitKind};

/// What to load, what to aim for and how long to run.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub data_dir: PathBuf,
    pub map: String,
    pub goal: Task,
    pub ticks: u32,
    pub tick_dt: f32,
    pub seed: u64,
    /// Workers placed on the start tile before the first tick.
    pub workers: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: ContentFactory::bundled().data_dir().to_path_buf(),
            map: "meadow".to_owned(),
            goal: Task::new(UnitKind::Worker, 5),
            ticks: 200,
            tick_dt: 1.0,
            seed: 0,
            workers: 3,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `AI_DATA_DIR` - Content directory (default: bundled content)
    /// - `AI_MAP` - Map name under `maps/` (default: meadow)
    /// - `AI_GOAL` - Goal as `kind:amount`, e.g. `soldier:2` (default: worker:5)
    /// - `AI_TICKS` - Number of ticks to run (default: 200)
    /// - `AI_TICK_DT` - Time units per tick (default: 1.0)
    /// - `AI_SEED` - Placement and exploration seed (default: 0)
    /// - `AI_WORKERS` - Starting workers (default: 3)
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(dir) = env::var("AI_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Ok(map) = env::var("AI_MAP") {
            config.map = map;
        }

        if let Ok(goal) = env::var("AI_GOAL") {
            config.goal = parse_goal(&goal).with_context(|| format!("invalid AI_GOAL {goal:?}"))?;
        }

        if let Some(ticks) = read_env::<u32>("AI_TICKS") {
            config.ticks = ticks;
        }

        if let Some(dt) = read_env::<f32>("AI_TICK_DT") {
            config.tick_dt = dt.max(0.0);
        }

        if let Some(seed) = read_env::<u64>("AI_SEED") {
            config.seed = seed;
        }

        if let Some(workers) = read_env::<u32>("AI_WORKERS") {
            config.workers = workers;
        }

        Ok(config)
    }
}

/// Parses `kind:amount` where kind names a unit, structure or resource.
pub fn parse_goal(input: &str) -> Result<Task> {
    let (kind, amount) = input
        .split_once(':')
        .context("expected kind:amount")?;
    let amount: u32 = amount.trim().parse().context("amount is not a number")?;
    let kind = kind.trim();

    let product = if let Ok(unit) = UnitKind::from_str(kind) {
        Product::Unit(unit)
    } else if let Ok(structure) = StructureKind::from_str(kind) {
        Product::Structure(structure)
    } else if let Ok(resource) = ResourceKind::from_str(kind) {
        Product::Resource(resource)
    } else {
        bail!("unknown product {kind:?}");
    };

    Ok(Task::new(product, amount))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goals_name_units_structures_and_resources() {
        assert_eq!(
            parse_goal("Soldier:2").unwrap(),
            Task::new(UnitKind::Soldier, 2)
        );
        assert_eq!(
            parse_goal("smithy: 1").unwrap(),
            Task::new(StructureKind::Smithy, 1)
        );
        assert_eq!(
            parse_goal("iron_ore:4").unwrap(),
            Task::new(ResourceKind::IronOre, 4)
        );
    }

    #[test]
    fn malformed_goals_are_rejected() {
        assert!(parse_goal("soldier").is_err());
        assert!(parse_goal("castle:1").is_err());
        assert!(parse_goal("worker:many").is_err());
    }
}
