//! In-process publish/subscribe with fan-out and no replay.
//!
//! `Broadcast<T>` wraps a `tokio::sync::broadcast` channel. Every subscriber
//! attached at the moment of `emit` receives its own clone of the value;
//! subscribers created later see only later emissions. Dropping a
//! `Subscription` detaches it.

use futures::stream::{self, Stream};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::warn;

/// Values retained per subscriber before a slow subscriber starts skipping.
pub const DEFAULT_CAPACITY: usize = 64;

/// Sending half of a broadcast channel. Clones publish to the same channel.
#[derive(Debug, Clone)]
pub struct Broadcast<T> {
    sender: broadcast::Sender<T>,
}

impl<T: Clone + Send + 'static> Broadcast<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Deliver `value` to every current subscriber and return how many were
    /// reached. With no subscribers the value is dropped.
    pub fn emit(&self, value: T) -> usize {
        self.sender.send(value).unwrap_or(0)
    }

    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T: Clone + Send + 'static> Default for Broadcast<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half handed out by [`Broadcast::subscribe`].
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: broadcast::Receiver<T>,
}

impl<T: Clone + Send + 'static> Subscription<T> {
    /// Wait for the next value. `None` once every `Broadcast` handle is gone.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            match self.receiver.recv().await {
                Ok(value) => return Some(value),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "subscriber lagged behind, skipping events");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take a value that has already been delivered, without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        loop {
            match self.receiver.try_recv() {
                Ok(value) => return Some(value),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "subscriber lagged behind, skipping events");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = T> + Send {
        stream::unfold(self, |mut subscription| async move {
            subscription.recv().await.map(|value| (value, subscription))
        })
    }
}
