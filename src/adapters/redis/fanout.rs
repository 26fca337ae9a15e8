//! Redis pub/sub implementation of FanoutChannel.
//!
//! Publishing goes through one shared multiplexed connection. Every
//! subscription gets its own dedicated pub/sub connection, because a Redis
//! connection in subscribe mode cannot run other commands. Dropping the
//! subscription drops that connection, which unsubscribes at the broker.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::document::Topic;
use crate::ports::{FanoutChannel, FanoutError, FanoutSubscription};

/// Redis-backed fanout shared by every server process.
#[derive(Clone)]
pub struct RedisFanout {
    client: redis::Client,
    publisher: MultiplexedConnection,
    timeout: Duration,
}

impl RedisFanout {
    /// Connects the publishing connection.
    ///
    /// Subscriptions connect lazily, one per call to `subscribe`.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, FanoutError> {
        let client =
            redis::Client::open(url).map_err(|e| FanoutError::Unavailable(e.to_string()))?;

        let publisher = tokio::time::timeout(timeout, client.get_multiplexed_tokio_connection())
            .await
            .map_err(|_| FanoutError::Unavailable("timed out connecting to Redis".into()))?
            .map_err(|e: redis::RedisError| FanoutError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            publisher,
            timeout,
        })
    }

    /// Round-trips a PING on the publishing connection.
    pub async fn ping(&self) -> Result<(), FanoutError> {
        let mut conn = self.publisher.clone();
        tokio::time::timeout(
            self.timeout,
            redis::cmd("PING").query_async::<_, ()>(&mut conn),
        )
        .await
        .map_err(|_| FanoutError::Unavailable("timed out pinging Redis".into()))?
        .map_err(|e| FanoutError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl FanoutChannel for RedisFanout {
    async fn publish(&self, topic: &Topic, payload: &str) -> Result<(), FanoutError> {
        let mut conn = self.publisher.clone();

        tokio::time::timeout(
            self.timeout,
            conn.publish::<_, _, ()>(topic.as_str(), payload),
        )
        .await
        .map_err(|_| FanoutError::Unavailable("timed out publishing to Redis".into()))?
        .map_err(|e: redis::RedisError| FanoutError::Unavailable(e.to_string()))
    }

    async fn subscribe(&self, topic: &Topic) -> Result<FanoutSubscription, FanoutError> {
        let open = async {
            let mut pubsub = self.client.get_async_connection().await?.into_pubsub();
            pubsub.subscribe(topic.as_str()).await?;
            Ok::<_, redis::RedisError>(pubsub)
        };

        let pubsub = tokio::time::timeout(self.timeout, open)
            .await
            .map_err(|_| FanoutError::Unavailable("timed out subscribing to Redis".into()))?
            .map_err(|e| FanoutError::Unavailable(e.to_string()))?;

        tracing::debug!(%topic, "subscribed to Redis channel");

        let name = topic.to_string();
        let stream = pubsub.into_on_message().filter_map(move |msg| {
            let payload = match msg.get_payload::<String>() {
                Ok(payload) => Some(Ok(payload)),
                Err(e) => {
                    tracing::warn!(topic = %name, error = %e, "skipping non-text payload");
                    None
                }
            };
            futures::future::ready(payload)
        });

        Ok(FanoutSubscription::new(topic.clone(), stream.boxed()))
    }
}

impl std::fmt::Debug for RedisFanout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisFanout")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
