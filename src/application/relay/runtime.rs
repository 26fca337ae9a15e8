//! Session Runtime - drives one authorized connection.
//!
//! Two loops run for the life of a session:
//!
//! - the client loop reads frames, applies them to the working copy, hands
//!   syncs to the checkpoint bridge and publishes every valid operation;
//! - the fanout loop forwards every payload on the document topic to the
//!   client byte-for-byte, including this session's own echoes.
//!
//! Whichever loop stops first cancels the other. The subscription is
//! released before the client connection, so nothing is delivered to a
//! connection after it is torn down. Syncs go through a per-session
//! checkpoint writer that is drained last, so they reach the store in the
//! order the client sent them.

use std::fmt::Display;
use std::sync::Arc;

use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::domain::document::{Operation, Topic, WorkingCopy};
use crate::domain::foundation::UserId;
use crate::ports::{FanoutChannel, FanoutError};

use super::access_gate::SessionSeed;
use super::checkpoint::{CheckpointBridge, CheckpointWriter};
use super::session::{Session, SessionEnd, SessionOutcome};

/// Opens and runs sessions against a fanout channel.
#[derive(Clone)]
pub struct SessionRuntime {
    fanout: Arc<dyn FanoutChannel>,
    checkpoint: CheckpointBridge,
}

impl SessionRuntime {
    pub fn new(fanout: Arc<dyn FanoutChannel>, checkpoint: CheckpointBridge) -> Self {
        Self { fanout, checkpoint }
    }

    /// Subscribe to the document topic and build the session state.
    ///
    /// Subscribing happens before any client frame is read, so the session
    /// sees every operation published from this point on.
    pub async fn open(&self, seed: SessionSeed) -> Result<Session, FanoutError> {
        let topic = Topic::for_document(seed.document_id);
        let subscription = self.fanout.subscribe(&topic).await?;
        Ok(Session::open(seed, subscription))
    }

    /// Run `session` until either the client or the subscription goes away.
    ///
    /// `inbound` yields text frames from the client; `outbound` carries
    /// relayed payloads back. Both are released when this returns, and any
    /// snapshots the client sent have been written (or have failed).
    pub async fn run<I, O, E>(&self, session: Session, inbound: I, outbound: O) -> SessionOutcome
    where
        I: Stream<Item = Result<String, E>> + Send,
        O: Sink<String> + Send,
        O::Error: Display + Send,
        E: Display + Send,
    {
        let Session {
            connection_id,
            document_id,
            user_id,
            mut working_copy,
            mut subscription,
        } = session;
        let topic = subscription.topic().clone();
        let span = tracing::info_span!("session", %connection_id, %document_id, %user_id);

        async move {
            tracing::info!("session started");
            futures::pin_mut!(inbound);
            futures::pin_mut!(outbound);
            let stop = CancellationToken::new();
            let checkpoint = self.checkpoint.writer(document_id);

            let client_loop = async {
                let end = loop {
                    tokio::select! {
                        _ = stop.cancelled() => break None,
                        frame = inbound.next() => match frame {
                            None => break Some(SessionEnd::ClientClosed),
                            Some(Err(e)) => break Some(SessionEnd::ClientError(e.to_string())),
                            Some(Ok(text)) => {
                                self.relay_client_frame(
                                    user_id,
                                    &topic,
                                    &mut working_copy,
                                    &checkpoint,
                                    &text,
                                )
                                .await
                            }
                        },
                    }
                };
                stop.cancel();
                end
            };

            let fanout_loop = async {
                let end = loop {
                    tokio::select! {
                        _ = stop.cancelled() => break None,
                        message = subscription.next_message() => match message {
                            None => break Some(SessionEnd::FanoutClosed),
                            Some(Err(e)) => break Some(SessionEnd::FanoutError(e.to_string())),
                            Some(Ok(payload)) => {
                                if let Err(e) = outbound.send(payload).await {
                                    break Some(SessionEnd::DeliveryFailed(e.to_string()));
                                }
                            }
                        },
                    }
                };
                stop.cancel();
                end
            };

            let (client_end, fanout_end) = tokio::join!(client_loop, fanout_loop);
            let end = client_end
                .or(fanout_end)
                .unwrap_or(SessionEnd::ClientClosed);

            subscription.release();
            // Best effort: the client may already be gone.
            let _ = outbound.close().await;
            checkpoint.finish().await;

            tracing::info!(reason = %end, "session ended");
            SessionOutcome { end, working_copy }
        }
        .instrument(span)
        .await
    }

    /// Handle one text frame from the client.
    ///
    /// Malformed frames are dropped without touching session state. A
    /// failed publish is logged and the operation is skipped.
    async fn relay_client_frame(
        &self,
        user_id: UserId,
        topic: &Topic,
        working_copy: &mut WorkingCopy,
        checkpoint: &CheckpointWriter,
        frame: &str,
    ) {
        let operation = match Operation::parse(frame) {
            Ok(operation) => operation,
            Err(e) => {
                tracing::debug!(error = %e, "dropping malformed frame");
                return;
            }
        };

        working_copy.apply(&operation);

        if let Operation::Sync { content } = &operation {
            checkpoint.enqueue(content.clone());
        }

        let kind = operation.kind();
        let payload = match operation.stamp(user_id).to_wire() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(op = kind, error = %e, "failed to encode operation");
                return;
            }
        };

        if let Err(e) = self.fanout.publish(topic, &payload).await {
            tracing::warn!(op = kind, error = %e, "publish failed, operation not relayed");
        }
    }
}

impl std::fmt::Debug for SessionRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRuntime").finish_non_exhaustive()
    }
}
