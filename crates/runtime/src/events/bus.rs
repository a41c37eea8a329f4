//! Topic-based event bus implementation.

use rules_core::{CastEvent, EventSink};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::TurnEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Cast outcomes (executed or failed)
    Cast,
    /// Turn management events
    Turn,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Cast(Box<CastEvent>),
    Turn(TurnEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Cast(_) => Topic::Cast,
            Event::Turn(_) => Topic::Turn,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; events sent while a
/// topic has no subscribers are dropped.
#[derive(Clone)]
pub struct EventBus {
    cast: broadcast::Sender<Event>,
    turn: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(rules_core::RulesConfig::DEFAULT_EVENT_CAPACITY)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            cast: broadcast::channel(capacity).0,
            turn: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Cast => &self.cast,
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
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> Vec<(Topic, broadcast::Receiver<Event>)> {
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

impl EventSink for EventBus {
    fn publish(&self, event: CastEvent) {
        EventBus::publish(self, Event::Cast(Box::new(event)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rules_core::{CastError, EntityId};

    fn failed() -> CastEvent {
        CastEvent::Failed {
            ability: "bite".into(),
            caster: EntityId(1),
            target: None,
            error: CastError::NotFound {
                ability: "bite".into(),
            },
        }
    }

    #[test]
    fn subscribers_only_see_their_topic() {
        let bus = EventBus::new();
        let mut casts = bus.subscribe(Topic::Cast);
        let mut turns = bus.subscribe(Topic::Turn);

        EventSink::publish(&bus, failed());
        bus.publish(Event::Turn(TurnEvent::Started { turn: 1 }));

        assert!(matches!(casts.try_recv(), Ok(Event::Cast(_))));
        assert!(casts.try_recv().is_err());
        assert!(matches!(
            turns.try_recv(),
            Ok(Event::Turn(TurnEvent::Started { turn: 1 }))
        ));
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::with_capacity(0);
        EventSink::publish(&bus, failed());
    }
}
