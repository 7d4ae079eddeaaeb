//! Simulation worker that owns the authoritative [`PlayerAi`].
//!
//! Receives commands from [`crate::RuntimeHandle`], ticks the agent and
//! answers queries. Events are published by the agent itself.
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use game_core::{EntityId, Position, Task};

use crate::agent::{AgentSnapshot, EntityKind, PlayerAi};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Replace the goal and rebuild the task queue.
    SetGoal {
        goal: Task,
        reply: oneshot::Sender<()>,
    },
    /// Place a finished, idle entity.
    SpawnEntity {
        kind: EntityKind,
        location: Position,
        reply: oneshot::Sender<EntityId>,
    },
    /// Advance the agent by `dt`.
    Tick { dt: f32, reply: oneshot::Sender<()> },
    /// Wait for outstanding path searches.
    Settle { reply: oneshot::Sender<()> },
    /// Query the agent state (read-only).
    Snapshot {
        reply: oneshot::Sender<AgentSnapshot>,
    },
}

/// Background task that processes agent commands.
pub struct SimulationWorker {
    agent: PlayerAi,
    command_rx: mpsc::Receiver<Command>,
    ticks: u64,
}

impl SimulationWorker {
    pub fn new(agent: PlayerAi, command_rx: mpsc::Receiver<Command>) -> Self {
        info!(?agent, "SimulationWorker initialized");
        Self {
            agent,
            command_rx,
            ticks: 0,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd).await;
                }
                else => break,
            }
        }
        info!(ticks = self.ticks, "SimulationWorker stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::SetGoal { goal, reply } => {
                self.agent.set_goal(goal);
                if reply.send(()).is_err() {
                    debug!("SetGoal reply channel closed (caller dropped)");
                }
            }
            Command::SpawnEntity {
                kind,
                location,
                reply,
            } => {
                let id = self.agent.spawn_entity(kind, location);
                if reply.send(id).is_err() {
                    debug!("SpawnEntity reply channel closed (caller dropped)");
                }
            }
            Command::Tick { dt, reply } => {
                self.agent.update(dt);
                self.ticks += 1;
                if reply.send(()).is_err() {
                    debug!("Tick reply channel closed (caller dropped)");
                }
            }
            Command::Settle { reply } => {
                self.agent.settle().await;
                if reply.send(()).is_err() {
                    debug!("Settle reply channel closed (caller dropped)");
                }
            }
            Command::Snapshot { reply } => {
                if reply.send(self.agent.snapshot()).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
        }
    }
}
