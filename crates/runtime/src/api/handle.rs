//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving the agent or streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{EntityId, Position, Task};

use super::errors::{Result, RuntimeError};
use crate::agent::{AgentSnapshot, EntityKind};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Replace the goal and rebuild the task queue
    pub async fn set_goal(&self, goal: Task) -> Result<()> {
        self.request(|reply| Command::SetGoal { goal, reply }).await
    }

    /// Place a finished, idle entity
    pub async fn spawn_entity(&self, kind: EntityKind, location: Position) -> Result<EntityId> {
        self.request(|reply| Command::SpawnEntity {
            kind,
            location,
            reply,
        })
        .await
    }

    /// Advance the agent by `dt` time units
    pub async fn tick(&self, dt: f32) -> Result<()> {
        self.request(|reply| Command::Tick { dt, reply }).await
    }

    /// Wait for every outstanding path search
    ///
    /// Results are applied on the next tick.
    pub async fn settle(&self) -> Result<()> {
        self.request(|reply| Command::Settle { reply }).await
    }

    /// Query the agent's current state (read-only snapshot)
    pub async fn snapshot(&self) -> Result<AgentSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Planner` - Goal and task queue changes
    /// - `Topic::Entities` - Production, spawns and state transitions
    /// - `Topic::Resources` - Deliveries, withdrawals and discoveries
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut planner_rx = handle.subscribe(Topic::Planner);
    /// while let Ok(event) = planner_rx.recv().await {
    ///     // Handle planner events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
