//! In-process fanout for tests and single-node development.
//!
//! One `tokio::sync::broadcast` channel per topic, created on first
//! subscribe. Only sessions inside this process see each other's traffic.
//!
//! # Panics
//!
//! Methods panic if the internal lock is poisoned. Multi-process
//! deployments should use the Redis fanout adapter.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::broadcast;

use crate::domain::document::Topic;
use crate::ports::{FanoutChannel, FanoutError, FanoutSubscription};

const DEFAULT_CAPACITY: usize = 1024;

/// Broadcast-channel fanout keyed by topic name.
#[derive(Debug)]
pub struct InMemoryFanout {
    topics: RwLock<HashMap<String, broadcast::Sender<String>>>,
    capacity: usize,
    published: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryFanout {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// `capacity` bounds how far a subscriber may lag before it skips messages.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
            published: AtomicUsize::new(0),
            unavailable: AtomicBool::new(false),
        }
    }

    // === Test Helpers ===

    /// Simulate a broker outage for publish and subscribe.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of payloads accepted by `publish`.
    pub fn published_count(&self) -> usize {
        self.published.load(Ordering::SeqCst)
    }

    /// Live subscriptions on `topic`.
    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.topics
            .read()
            .expect("InMemoryFanout: topics lock poisoned")
            .get(topic.as_str())
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    /// Drop the channel for `topic`; its subscriptions end after draining.
    pub fn close_topic(&self, topic: &Topic) {
        self.topics
            .write()
            .expect("InMemoryFanout: topics lock poisoned")
            .remove(topic.as_str());
    }

    fn ensure_available(&self) -> Result<(), FanoutError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(FanoutError::Unavailable("in-memory broker offline".into()));
        }
        Ok(())
    }
}

impl Default for InMemoryFanout {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FanoutChannel for InMemoryFanout {
    async fn publish(&self, topic: &Topic, payload: &str) -> Result<(), FanoutError> {
        self.ensure_available()?;
        self.published.fetch_add(1, Ordering::SeqCst);

        let mut topics = self
            .topics
            .write()
            .expect("InMemoryFanout: topics lock poisoned");
        if let Some(sender) = topics.get(topic.as_str()) {
            // Nobody listening is not an error; the channel is just idle.
            if sender.send(payload.to_string()).is_err() {
                topics.remove(topic.as_str());
            }
        }
        Ok(())
    }

    async fn subscribe(&self, topic: &Topic) -> Result<FanoutSubscription, FanoutError> {
        self.ensure_available()?;

        let receiver = self
            .topics
            .write()
            .expect("InMemoryFanout: topics lock poisoned")
            .entry(topic.as_str().to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe();

        let name = topic.to_string();
        let stream = futures::stream::unfold((receiver, name), |(mut receiver, name)| async move {
            loop {
                match receiver.recv().await {
                    Ok(payload) => return Some((Ok(payload), (receiver, name))),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(topic = %name, skipped, "subscriber lagged, messages dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        });

        Ok(FanoutSubscription::new(topic.clone(), stream.boxed()))
    }
}
