/// Planner and behavior tunables.
///
/// Intervals and durations are expressed in the same time unit as the
/// `dt` passed to each tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// How often the global agent state rebuilds the task queue from the goal.
    pub task_update_interval: f32,
    /// How often gather orchestration re-balances idle workers.
    pub gather_update_interval: f32,
    /// Active gatherers wanted before urgent worker production stops.
    pub gather_target: u32,
    /// Upper bound on workers switched into gathering.
    pub gather_conversion_cap: u32,
    /// How often explore orchestration activates idle explorers.
    pub explore_update_interval: f32,
    /// Explorers wanted while a resource has not been found.
    pub explorer_target: u32,
    /// How often a structure waiting for staff scans for artisans.
    pub artisan_scan_interval: f32,
    /// Artisans of the required profession each structure needs.
    pub artisans_per_structure: u32,
    /// Artisan population cap for automatic artisan production.
    pub max_artisans: u32,
    /// Chebyshev radius around the start position where structures may be placed.
    pub buildable_radius: u32,
    /// Fog radius lifted around the start position and newly trained explorers.
    pub reveal_radius: u32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_DEPOSITS_PER_TILE: usize = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TASK_UPDATE_INTERVAL: f32 = 100.0;
    pub const DEFAULT_GATHER_UPDATE_INTERVAL: f32 = 1.0;
    pub const DEFAULT_GATHER_TARGET: u32 = 10;
    pub const DEFAULT_GATHER_CONVERSION_CAP: u32 = 20;
    pub const DEFAULT_EXPLORE_UPDATE_INTERVAL: f32 = 1.0;
    pub const DEFAULT_EXPLORER_TARGET: u32 = 5;
    pub const DEFAULT_ARTISAN_SCAN_INTERVAL: f32 = 5.0;
    pub const DEFAULT_ARTISANS_PER_STRUCTURE: u32 = 1;
    pub const DEFAULT_MAX_ARTISANS: u32 = 4;
    pub const DEFAULT_BUILDABLE_RADIUS: u32 = 1;
    pub const DEFAULT_REVEAL_RADIUS: u32 = 1;

    pub fn new() -> Self {
        Self {
            task_update_interval: Self::DEFAULT_TASK_UPDATE_INTERVAL,
            gather_update_interval: Self::DEFAULT_GATHER_UPDATE_INTERVAL,
            gather_target: Self::DEFAULT_GATHER_TARGET,
            gather_conversion_cap: Self::DEFAULT_GATHER_CONVERSION_CAP,
            explore_update_interval: Self::DEFAULT_EXPLORE_UPDATE_INTERVAL,
            explorer_target: Self::DEFAULT_EXPLORER_TARGET,
            artisan_scan_interval: Self::DEFAULT_ARTISAN_SCAN_INTERVAL,
            artisans_per_structure: Self::DEFAULT_ARTISANS_PER_STRUCTURE,
            max_artisans: Self::DEFAULT_MAX_ARTISANS,
            buildable_radius: Self::DEFAULT_BUILDABLE_RADIUS,
            reveal_radius: Self::DEFAULT_REVEAL_RADIUS,
        }
    }

    pub fn with_task_update_interval(mut self, interval: f32) -> Self {
        self.task_update_interval = interval;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
