//! FanoutChannel port - publish/subscribe keyed by document topic.
//!
//! Decouples the server processes that hold connections for the same
//! document. Publishing is fire-and-forget: success means the broker took
//! the message, not that anyone received it. A subscription yields every
//! message published to its topic by any process, including the
//! subscriber's own publishes.
//!
//! Ordering within one topic follows publish order per publishing process,
//! best-effort. Nothing is ordered across topics, and nothing is replayed
//! to a subscriber that was not listening when a message went out.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use thiserror::Error;

use crate::domain::document::Topic;

/// Errors talking to the fanout broker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FanoutError {
    /// The broker could not be reached or refused the command.
    #[error("Fanout broker unavailable: {0}")]
    Unavailable(String),

    /// An established subscription broke.
    #[error("Fanout subscription lost: {0}")]
    SubscriptionLost(String),
}

/// Raw payloads arriving on a subscribed topic.
pub type FanoutStream = BoxStream<'static, Result<String, FanoutError>>;

/// A live subscription to one topic.
///
/// The subscription is held for exactly as long as this value lives;
/// dropping it (or calling [`release`](Self::release)) unsubscribes.
pub struct FanoutSubscription {
    topic: Topic,
    stream: FanoutStream,
}

impl FanoutSubscription {
    /// Wraps an adapter's message stream.
    pub fn new(topic: Topic, stream: FanoutStream) -> Self {
        Self { topic, stream }
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Next raw payload; `None` when the subscription has ended.
    ///
    /// Cancel safe: dropping the returned future loses no message.
    pub async fn next_message(&mut self) -> Option<Result<String, FanoutError>> {
        self.stream.next().await
    }

    /// Unsubscribes and frees the broker connection backing this subscription.
    pub fn release(self) {
        tracing::debug!(topic = %self.topic, "fanout subscription released");
        drop(self.stream);
    }
}

impl std::fmt::Debug for FanoutSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutSubscription")
            .field("topic", &self.topic)
            .finish_non_exhaustive()
    }
}

/// Port for the cross-process broadcast layer.
#[async_trait]
pub trait FanoutChannel: Send + Sync {
    /// Publish one payload to `topic`.
    async fn publish(&self, topic: &Topic, payload: &str) -> Result<(), FanoutError>;

    /// Open a subscription to `topic`.
    async fn subscribe(&self, topic: &Topic) -> Result<FanoutSubscription, FanoutError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DocumentId;

    #[tokio::test]
    async fn subscription_yields_stream_items_then_ends() {
        let topic = Topic::for_document(DocumentId::new(1).unwrap());
        let items = futures::stream::iter(vec![Ok("a".to_string()), Ok("b".to_string())]);
        let mut subscription = FanoutSubscription::new(topic, items.boxed());

        assert_eq!(subscription.next_message().await, Some(Ok("a".to_string())));
        assert_eq!(subscription.next_message().await, Some(Ok("b".to_string())));
        assert_eq!(subscription.next_message().await, None);
        subscription.release();
    }

    #[test]
    fn fanout_channel_trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn FanoutChannel>();
    }
}
