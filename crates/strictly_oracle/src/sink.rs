//! Event sink that forwards into a Tokio channel.

use std::sync::Arc;
use strictly_board::EventSink;
use tokio::sync::mpsc;
use tracing::trace;

/// Forwards every event into an unbounded channel. Never blocks.
#[derive(Debug)]
pub struct ChannelSink<E> {
    tx: mpsc::UnboundedSender<E>,
}

impl<E> ChannelSink<E> {
    /// Wraps an existing sender.
    pub fn new(tx: mpsc::UnboundedSender<E>) -> Self {
        Self { tx }
    }

    /// Creates a sink and the receiver that drains it.
    pub fn channel() -> (Arc<Self>, mpsc::UnboundedReceiver<E>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self::new(tx)), rx)
    }
}

impl<E> EventSink<E> for ChannelSink<E>
where
    E: Clone + Send + Sync + std::fmt::Debug,
{
    fn emit(&self, event: &E) {
        if self.tx.send(event.clone()).is_err() {
            trace!(?event, "Receiver dropped, event discarded");
        }
    }
}
