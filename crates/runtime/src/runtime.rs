//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive the agent.
use std::env;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use game_core::{GameConfig, Position};

use crate::agent::{EntityKind, PlayerAi};
use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::oracle::OracleManager;
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Override fields from process environment variables.
    ///
    /// Environment variables:
    /// - `AI_COMMAND_BUFFER` - Command queue size (default: 32)
    /// - `AI_EVENT_BUFFER` - Per-topic event capacity (default: 100)
    /// - `AI_TASK_UPDATE_INTERVAL` - Time between task queue rebuilds (default: 100)
    pub fn with_env(mut self) -> Self {
        if let Some(capacity) = read_env::<usize>("AI_COMMAND_BUFFER") {
            self.command_buffer_size = capacity.max(1);
        }

        if let Some(capacity) = read_env::<usize>("AI_EVENT_BUFFER") {
            self.event_buffer_size = capacity.max(1);
        }

        if let Some(interval) = read_env::<f32>("AI_TASK_UPDATE_INTERVAL") {
            self.game_config = self.game_config.with_task_update_interval(interval.max(0.0));
        }

        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

/// Main runtime that hosts the player agent
///
/// Runtime owns the worker; [`RuntimeHandle`] provides a cloneable façade
/// for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Advance the agent `ticks` times by `dt`, settling path searches after
    /// every tick so each tick sees the previous tick's completions.
    pub async fn run_for(&self, ticks: u32, dt: f32) -> Result<()> {
        for _ in 0..ticks {
            self.handle.tick(dt).await?;
            self.handle.settle().await?;
        }
        Ok(())
    }

    /// Shutdown the runtime gracefully
    ///
    /// Clones of the handle keep the worker alive; drop them first.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    oracles: Option<OracleManager>,
    start_position: Option<Position>,
    seed: u64,
    entities: Vec<(EntityKind, Position)>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            oracles: None,
            start_position: None,
            seed: 0,
            entities: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set required oracle manager
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Override the map's start position
    pub fn start_position(mut self, start: Position) -> Self {
        self.start_position = Some(start);
        self
    }

    /// Seed for placement and exploration choices
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Place a finished, idle entity before the first tick
    pub fn entity(mut self, kind: EntityKind, location: Position) -> Self {
        self.entities.push((kind, location));
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingOracles)?;
        let start = self
            .start_position
            .unwrap_or_else(|| oracles.start_position());

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let mut agent = PlayerAi::new(
            self.config.game_config,
            &oracles,
            start,
            self.seed,
            event_bus.clone(),
        )?;
        for (kind, location) in self.entities {
            agent.spawn_entity(kind, location);
        }

        let handle = RuntimeHandle::new(command_tx, event_bus);

        let sim_worker = SimulationWorker::new(agent, command_rx);
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        info!(%start, seed = self.seed, "runtime started");
        Ok(Runtime {
            handle,
            sim_worker_handle,
        })
    }
}
