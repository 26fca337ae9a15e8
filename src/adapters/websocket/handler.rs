//! WebSocket upgrade handler for collaboration sessions.
//!
//! Handles the HTTP → WebSocket upgrade and the connection lifecycle:
//! 1. Parse the document id (HTTP 400 if it is not a positive integer)
//! 2. Run the Access Gate on the `token` query parameter
//! 3. Upgrade; on rejection send a close frame with the gate's code
//! 4. Subscribe to the document topic
//! 5. Hand the split socket to the Session Runtime until either side ends

use std::borrow::Cow;

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{future, SinkExt, Stream, StreamExt};
use serde::Deserialize;

use crate::application::relay::close_codes;
use crate::application::{AccessGate, SessionRuntime, SessionSeed};
use crate::domain::foundation::DocumentId;

/// State shared by every collaboration connection.
#[derive(Clone, Debug)]
pub struct RelayState {
    pub gate: AccessGate,
    pub runtime: SessionRuntime,
}

impl RelayState {
    pub fn new(gate: AccessGate, runtime: SessionRuntime) -> Self {
        Self { gate, runtime }
    }
}

/// Query parameters of the collaboration endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    pub token: Option<String>,
}

/// Route: `GET /ws/collaboration/:document_id?token=...`
pub async fn collaboration_ws(
    ws: WebSocketUpgrade,
    Path(raw_document_id): Path<String>,
    Query(params): Query<ConnectParams>,
    State(state): State<RelayState>,
) -> Response {
    let document_id: DocumentId = match raw_document_id.parse() {
        Ok(id) => id,
        Err(_) => {
            return (StatusCode::BAD_REQUEST, "Invalid document id").into_response();
        }
    };

    match state.gate.authorize(params.token.as_deref(), document_id).await {
        Ok(seed) => ws.on_upgrade(move |socket| serve_session(socket, seed, state.runtime)),
        Err(rejection) => {
            tracing::info!(
                %document_id,
                code = rejection.close_code(),
                reason = %rejection,
                "connection rejected"
            );
            let code = rejection.close_code();
            let reason = rejection.reason();
            ws.on_upgrade(move |socket| close_with(socket, code, reason))
        }
    }
}

/// Run an authorized connection to completion.
async fn serve_session(socket: WebSocket, seed: SessionSeed, runtime: SessionRuntime) {
    let document_id = seed.document_id;
    let session = match runtime.open(seed).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(%document_id, error = %e, "fanout subscription failed");
            close_with(
                socket,
                close_codes::INTERNAL_ERROR,
                close_codes::FANOUT_UNAVAILABLE_REASON,
            )
            .await;
            return;
        }
    };

    let (sender, receiver) = socket.split();
    let outbound =
        sender.with(|text: String| future::ready(Ok::<_, axum::Error>(Message::Text(text))));

    let outcome = runtime.run(session, client_frames(receiver), outbound).await;
    tracing::debug!(
        %document_id,
        reason = %outcome.end,
        chars = outcome.working_copy.char_len(),
        "connection finished"
    );
}

/// Text frames from the client, ending at its close frame.
///
/// Binary frames are not operations and are skipped; ping/pong is answered
/// by the transport.
fn client_frames<S>(receiver: S) -> impl Stream<Item = Result<String, axum::Error>> + Send
where
    S: Stream<Item = Result<Message, axum::Error>> + Send,
{
    receiver
        .take_while(|frame| future::ready(!matches!(frame, Ok(Message::Close(_)))))
        .filter_map(|frame| {
            future::ready(match frame {
                Ok(Message::Text(text)) => Some(Ok(text)),
                Ok(Message::Binary(bytes)) => {
                    tracing::debug!(len = bytes.len(), "ignoring binary frame");
                    None
                }
                Ok(_) => None,
                Err(e) => Some(Err(e)),
            })
        })
}

/// Send a close frame and drop the socket.
async fn close_with(mut socket: WebSocket, code: u16, reason: impl Into<Cow<'static, str>>) {
    let frame = CloseFrame {
        code,
        reason: reason.into(),
    };
    if let Err(e) = socket.send(Message::Close(Some(frame))).await {
        tracing::debug!(code, error = %e, "client gone before close frame");
    }
}
