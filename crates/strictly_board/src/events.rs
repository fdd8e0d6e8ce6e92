//! Per-instance event delivery.
//!
//! Every engine (and every move coordinator) owns its own [`EventBus`].
//! Subscriptions live exactly as long as the bus, so sessions never
//! observe each other's events.

use crate::rules::Line;
use crate::Player;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{instrument, trace};

/// Events emitted by the game engine, in transition order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh session began.
    GameStarted {
        /// Id of the new session.
        session_id: u64,
    },
    /// A mark was placed.
    MoveMade {
        /// Board index of the mark.
        index: usize,
        /// Player who placed it.
        player: Player,
    },
    /// A completed line was found. Always precedes [`GameEvent::GameWon`].
    WinningLineFound {
        /// The completed line.
        line: Line,
    },
    /// The game ended with a winner.
    GameWon {
        /// The winning player.
        winner: Player,
        /// The completed line.
        line: Line,
    },
    /// The board filled with no winner.
    GameDraw,
}

/// Receiver of events of type `E`.
///
/// Sinks are called synchronously while the emitter holds its state,
/// so implementations must not block.
pub trait EventSink<E>: Send + Sync {
    /// Delivers one event.
    fn emit(&self, event: &E);
}

impl<E, F> EventSink<E> for F
where
    F: Fn(&E) + Send + Sync,
{
    fn emit(&self, event: &E) {
        self(event)
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Ordered fan-out of events to any number of sinks.
pub struct EventBus<E> {
    sinks: Vec<(SubscriptionId, Arc<dyn EventSink<E>>)>,
    next_id: u64,
}

impl<E: fmt::Debug> EventBus<E> {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            next_id: 0,
        }
    }

    /// Adds a sink; it receives every event emitted from now on.
    #[instrument(skip_all, fields(subscribers = self.sinks.len()))]
    pub fn subscribe(&mut self, sink: Arc<dyn EventSink<E>>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.sinks.push((id, sink));
        id
    }

    /// Removes a sink. Returns false if the id was unknown.
    #[instrument(skip(self))]
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.sinks.len();
        self.sinks.retain(|(sid, _)| *sid != id);
        self.sinks.len() != before
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// True when nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Delivers `event` to every sink in subscription order.
    pub fn emit(&self, event: E) {
        trace!(?event, subscribers = self.sinks.len(), "Emitting event");
        for (_, sink) in &self.sinks {
            sink.emit(&event);
        }
    }
}

impl<E: fmt::Debug> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.sinks.len())
            .finish()
    }
}
