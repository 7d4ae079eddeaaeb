//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::{EntityEvent, PlannerEvent, ResourceEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Goal and task queue changes
    Planner,
    /// Entity lifecycle and state changes
    Entities,
    /// Resource tally and discoveries
    Resources,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Planner(PlannerEvent),
    Entity(EntityEvent),
    Resource(ResourceEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Planner(_) => Topic::Planner,
            Event::Entity(_) => Topic::Entities,
            Event::Resource(_) => Topic::Resources,
        }
    }
}

impl From<PlannerEvent> for Event {
    fn from(event: PlannerEvent) -> Self {
        Event::Planner(event)
    }
}

impl From<EntityEvent> for Event {
    fn from(event: EntityEvent) -> Self {
        Event::Entity(event)
    }
}

impl From<ResourceEvent> for Event {
    fn from(event: ResourceEvent) -> Self {
        Event::Resource(event)
    }
}

struct Channels {
    planner: broadcast::Sender<Event>,
    entities: broadcast::Sender<Event>,
    resources: broadcast::Sender<Event>,
}

impl Channels {
    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Planner => &self.planner,
            Topic::Entities => &self.entities,
            Topic::Resources => &self.resources,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; events published while
/// nobody listens are dropped.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                planner: broadcast::channel(capacity).0,
                entities: broadcast::channel(capacity).0,
                resources: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();
        if self.channels.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{ResourceKind, StructureKind, Task};

    #[test]
    fn subscribers_only_see_their_topic() {
        let bus = EventBus::new();
        let mut planner = bus.subscribe(Topic::Planner);
        let mut resources = bus.subscribe(Topic::Resources);

        bus.publish(PlannerEvent::TaskStarted {
            task: Task::new(StructureKind::Camp, 1),
        });

        assert!(matches!(
            planner.try_recv(),
            Ok(Event::Planner(PlannerEvent::TaskStarted { .. }))
        ));
        assert!(resources.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let bus = EventBus::with_capacity(0);
        bus.publish(ResourceEvent::Deposited {
            kind: ResourceKind::Tree,
            total: 1,
        });

        let mut late = bus.subscribe(Topic::Resources);
        assert!(late.try_recv().is_err());
    }
}
