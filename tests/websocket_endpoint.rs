//! Loopback tests for the collaboration WebSocket endpoint.
//!
//! Starts the real router on an ephemeral port with in-memory fanout and
//! documents, then connects with a WebSocket client.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use futures::{SinkExt, StreamExt};
use http::{Request, StatusCode};
use serde_json::{json, Value};
use tokio_tungstenite::tungstenite::{self, Message};
use tower::ServiceExt;

use collab_relay::adapters::http::relay_router;
use collab_relay::adapters::{
    InMemoryDocuments, InMemoryFanout, JwtTokenVerifier, MockTokenVerifier, RelayState,
};
use collab_relay::application::relay::close_codes;
use collab_relay::application::{AccessGate, CheckpointBridge, SessionRuntime};
use collab_relay::domain::document::Topic;
use collab_relay::domain::foundation::{DocumentId, UserId};
use collab_relay::ports::TokenVerifier;

type Client =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

const JWT_SECRET: &[u8] = b"loopback-test-secret";

fn doc(id: i64) -> DocumentId {
    DocumentId::new(id).unwrap()
}

fn user(id: i64) -> UserId {
    UserId::new(id).unwrap()
}

struct TestServer {
    addr: SocketAddr,
    fanout: Arc<InMemoryFanout>,
    documents: Arc<InMemoryDocuments>,
}

fn seeded_documents() -> Arc<InMemoryDocuments> {
    let documents = Arc::new(InMemoryDocuments::new());
    documents.insert_document(doc(1), user(1), "hello");
    documents.grant(doc(1), user(2));
    documents
}

fn mock_verifier() -> Arc<dyn TokenVerifier> {
    Arc::new(
        MockTokenVerifier::new()
            .with_user("alice", user(1))
            .with_user("bob", user(2))
            .with_user("mallory", user(3)),
    )
}

fn app(
    verifier: Arc<dyn TokenVerifier>,
    fanout: Arc<InMemoryFanout>,
    documents: Arc<InMemoryDocuments>,
) -> axum::Router {
    let gate = AccessGate::new(verifier, documents.clone());
    let runtime = SessionRuntime::new(fanout, CheckpointBridge::new(documents));
    relay_router(RelayState::new(gate, runtime), &[])
}

/// Helper: start an actual TCP server for WebSocket testing.
async fn start_server(verifier: Arc<dyn TokenVerifier>) -> TestServer {
    let fanout = Arc::new(InMemoryFanout::new());
    let documents = seeded_documents();
    let app = app(verifier, fanout.clone(), documents.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        addr,
        fanout,
        documents,
    }
}

impl TestServer {
    async fn connect(&self, path_and_query: &str) -> Client {
        let url = format!("ws://{}{}", self.addr, path_and_query);
        let (client, _) = tokio_tungstenite::connect_async(&url)
            .await
            .expect("ws connect");
        client
    }

    /// Wait until `n` sessions are subscribed to document 1.
    async fn wait_for_subscribers(&self, n: usize) {
        let topic = Topic::for_document(doc(1));
        tokio::time::timeout(Duration::from_secs(2), async {
            while self.fanout.subscriber_count(&topic) != n {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("sessions did not subscribe in time");
    }
}

async fn expect_close_code(client: &mut Client) -> (u16, String) {
    let frame = tokio::time::timeout(Duration::from_secs(2), client.next())
        .await
        .expect("timed out waiting for close")
        .expect("stream ended without close frame")
        .expect("transport error");
    match frame {
        Message::Close(Some(close)) => (u16::from(close.code), close.reason.into_owned()),
        other => panic!("expected close frame, got {:?}", other),
    }
}

async fn next_json(client: &mut Client) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(2), client.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream ended")
            .expect("transport error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).expect("relayed JSON");
        }
    }
}

#[tokio::test]
async fn missing_token_is_closed_with_4000() {
    let server = start_server(mock_verifier()).await;
    let mut client = server.connect("/ws/collaboration/1").await;

    let (code, reason) = expect_close_code(&mut client).await;

    assert_eq!(code, close_codes::MISSING_CREDENTIAL);
    assert_eq!(reason, "token is required");
}

#[tokio::test]
async fn empty_token_counts_as_missing() {
    let server = start_server(mock_verifier()).await;
    let mut client = server.connect("/ws/collaboration/1?token=").await;

    let (code, _) = expect_close_code(&mut client).await;

    assert_eq!(code, close_codes::MISSING_CREDENTIAL);
}

#[tokio::test]
async fn unknown_token_is_closed_with_4001() {
    let server = start_server(mock_verifier()).await;
    let mut client = server.connect("/ws/collaboration/1?token=forged").await;

    let (code, reason) = expect_close_code(&mut client).await;

    assert_eq!(code, close_codes::INVALID_CREDENTIAL);
    assert_eq!(reason, "Invalid token");
}

#[tokio::test]
async fn ungranted_user_is_closed_with_4003() {
    let server = start_server(mock_verifier()).await;
    let mut client = server.connect("/ws/collaboration/1?token=mallory").await;

    let (code, reason) = expect_close_code(&mut client).await;

    assert_eq!(code, close_codes::ACCESS_DENIED);
    assert_eq!(reason, "Access denied");
}

#[tokio::test]
async fn absent_document_is_closed_with_4003() {
    let server = start_server(mock_verifier()).await;
    let mut client = server.connect("/ws/collaboration/404?token=alice").await;

    let (code, _) = expect_close_code(&mut client).await;

    assert_eq!(code, close_codes::ACCESS_DENIED);
}

#[tokio::test]
async fn fanout_outage_is_closed_with_1011() {
    let server = start_server(mock_verifier()).await;
    server.fanout.set_unavailable(true);
    let mut client = server.connect("/ws/collaboration/1?token=alice").await;

    let (code, reason) = expect_close_code(&mut client).await;

    assert_eq!(code, close_codes::INTERNAL_ERROR);
    assert_eq!(reason, close_codes::FANOUT_UNAVAILABLE_REASON);
}

#[tokio::test]
async fn non_integer_document_id_is_rejected_before_upgrade() {
    let server = start_server(mock_verifier()).await;
    let url = format!("ws://{}/ws/collaboration/abc?token=alice", server.addr);

    let error = tokio_tungstenite::connect_async(&url).await.unwrap_err();

    match error {
        tungstenite::Error::Http(response) => {
            assert_eq!(response.status(), StatusCode::BAD_REQUEST)
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn operations_are_relayed_between_clients() {
    let server = start_server(mock_verifier()).await;
    let mut alice = server.connect("/ws/collaboration/1?token=alice").await;
    let mut bob = server.connect("/ws/collaboration/1?token=bob").await;
    server.wait_for_subscribers(2).await;

    alice
        .send(Message::Text(
            json!({"op": "insert", "position": 5, "text": " world"}).to_string(),
        ))
        .await
        .unwrap();

    let expected = json!({"op": "insert", "position": 5, "text": " world", "user_id": 1});
    assert_eq!(next_json(&mut alice).await, expected);
    assert_eq!(next_json(&mut bob).await, expected);
}

#[tokio::test]
async fn binary_and_malformed_frames_are_ignored() {
    let server = start_server(mock_verifier()).await;
    let mut alice = server.connect("/ws/collaboration/1?token=alice").await;
    server.wait_for_subscribers(1).await;

    alice.send(Message::Binary(vec![0, 1, 2])).await.unwrap();
    alice.send(Message::Text("garbage".into())).await.unwrap();
    alice
        .send(Message::Text(json!({"op": "sync", "content": "after"}).to_string()))
        .await
        .unwrap();

    assert_eq!(
        next_json(&mut alice).await,
        json!({"op": "sync", "content": "after", "user_id": 1})
    );
    assert_eq!(server.fanout.published_count(), 1);
}

#[tokio::test]
async fn sync_over_the_wire_is_persisted() {
    let server = start_server(mock_verifier()).await;
    let mut alice = server.connect("/ws/collaboration/1?token=alice").await;
    server.wait_for_subscribers(1).await;

    alice
        .send(Message::Text(json!({"op": "sync", "content": "saved"}).to_string()))
        .await
        .unwrap();
    next_json(&mut alice).await;

    tokio::time::timeout(Duration::from_secs(2), async {
        while server.documents.content_of(doc(1)).as_deref() != Some("saved") {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("snapshot was not persisted");
}

#[tokio::test]
async fn closing_the_socket_releases_the_subscription() {
    let server = start_server(mock_verifier()).await;
    let mut alice = server.connect("/ws/collaboration/1?token=alice").await;
    server.wait_for_subscribers(1).await;

    alice.close(None).await.unwrap();

    server.wait_for_subscribers(0).await;
}

#[tokio::test]
async fn signed_jwt_opens_a_session() {
    let issuer = JwtTokenVerifier::new(JWT_SECRET, jsonwebtoken::Algorithm::HS256);
    let token = issuer.issue(user(2), Duration::from_secs(60)).unwrap();
    let verifier = Arc::new(JwtTokenVerifier::new(
        JWT_SECRET,
        jsonwebtoken::Algorithm::HS256,
    ));
    let server = start_server(verifier).await;

    let mut bob = server
        .connect(&format!("/ws/collaboration/1?token={}", token))
        .await;
    server.wait_for_subscribers(1).await;

    bob.send(Message::Text(
        json!({"op": "delete", "position": 0}).to_string(),
    ))
    .await
    .unwrap();

    assert_eq!(
        next_json(&mut bob).await,
        json!({"op": "delete", "position": 0, "length": 1, "user_id": 2})
    );
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = app(
        mock_verifier(),
        Arc::new(InMemoryFanout::new()),
        seeded_documents(),
    );

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}
