//! Topic-based event bus implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tactics_core::InteractionEvent;
use tokio::sync::broadcast;

use super::types::TurnEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Interaction events drained from each tick, in emission order
    Interaction,
    /// Tick completion and session lifecycle
    Turn,
}

impl Topic {
    pub const ALL: [Topic; 2] = [Topic::Interaction, Topic::Turn];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Interaction(InteractionEvent),
    Turn(TurnEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Interaction(_) => Topic::Interaction,
            Event::Turn(_) => Topic::Turn,
        }
    }
}

/// Topic-based event bus
///
/// Delivery is best effort: a publish with no subscribers is dropped, and a
/// subscriber that falls more than the capacity behind observes `Lagged`.
#[derive(Clone)]
pub struct EventBus {
    interaction: broadcast::Sender<Event>,
    turn: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            interaction: broadcast::channel(capacity).0,
            turn: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Interaction => &self.interaction,
            Topic::Turn => &self.turn,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics.iter().map(|&topic| (topic, self.subscribe(topic))).collect()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.sender(topic).receiver_count()
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
    use tactics_core::ActorId;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut turns = bus.subscribe(Topic::Turn);
        let mut interactions = bus.subscribe(Topic::Interaction);

        bus.publish(Event::Turn(TurnEvent::TickCompleted {
            turn: 1,
            events: 0,
            faults: 0,
        }));
        bus.publish(Event::Interaction(InteractionEvent::ActorDied {
            actor: ActorId(3),
            killer: None,
        }));

        assert!(matches!(turns.recv().await.unwrap(), Event::Turn(_)));
        assert!(matches!(interactions.recv().await.unwrap(), Event::Interaction(_)));
        assert!(turns.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(Topic::Interaction), 0);
        bus.publish(Event::Turn(TurnEvent::TickCompleted {
            turn: 1,
            events: 0,
            faults: 0,
        }));
    }

    #[test]
    fn clones_share_channels() {
        let bus = EventBus::new();
        let _rx = bus.clone().subscribe(Topic::Turn);
        assert_eq!(bus.subscriber_count(Topic::Turn), 1);
    }
}
