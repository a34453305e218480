//! Shared test harness: a mock upstream provider and router helpers.
//!
//! The mock is a real axum server on `127.0.0.1:0`, so the relay's reqwest
//! client goes through an actual socket.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, header},
    response::Response,
    routing::post,
};
use bytes::{Bytes, BytesMut};
use chatrelay_core::RelayConfig;
use chatrelay_proxy::{AppState, RelayState, create_router};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tower::ServiceExt;

/// API key configured on the relay under test.
pub const TEST_API_KEY: &str = "sk-test-key";

/// Model configured on the relay under test.
pub const TEST_MODEL: &str = "claude-test-model";

/// Max tokens configured on the relay under test.
pub const TEST_MAX_TOKENS: u32 = 321;

/// One call the mock upstream received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub headers: HeaderMap,
    pub body: Value,
}

enum Reply {
    Fixed {
        status: StatusCode,
        headers: Vec<(&'static str, &'static str)>,
        body: String,
    },
    Stream(Mutex<Option<(mpsc::Receiver<Bytes>, oneshot::Sender<()>)>>),
}

struct MockState {
    calls: Mutex<Vec<RecordedCall>>,
    reply: Reply,
}

/// Handle to a running mock upstream.
#[derive(Clone)]
pub struct MockUpstream {
    pub url: String,
    state: Arc<MockState>,
}

/// Test-side control of a streaming mock.
pub struct StreamControl {
    /// Each send becomes one chunk of the upstream body.
    pub tx: mpsc::Sender<Bytes>,
    /// Fires when the upstream body stream is dropped.
    pub dropped: oneshot::Receiver<()>,
}

impl MockUpstream {
    /// Mock that answers every call with `status` and a JSON body.
    pub async fn json(status: StatusCode, body: Value) -> Self {
        Self::fixed(status, Vec::new(), body.to_string()).await
    }

    /// Mock that answers every call with `status`, extra headers and a raw body.
    pub async fn fixed(
        status: StatusCode,
        headers: Vec<(&'static str, &'static str)>,
        body: impl Into<String>,
    ) -> Self {
        Self::spawn(Reply::Fixed {
            status,
            headers,
            body: body.into(),
        })
        .await
    }

    /// Mock that answers one call with an event stream fed from the test.
    pub async fn streaming() -> (Self, StreamControl) {
        let (tx, rx) = mpsc::channel(8);
        let (dropped_tx, dropped_rx) = oneshot::channel();
        let mock = Self::spawn(Reply::Stream(Mutex::new(Some((rx, dropped_tx))))).await;
        (
            mock,
            StreamControl {
                tx,
                dropped: dropped_rx,
            },
        )
    }

    async fn spawn(reply: Reply) -> Self {
        let state = Arc::new(MockState {
            calls: Mutex::new(Vec::new()),
            reply,
        });

        let app = Router::new()
            .route("/v1/messages", post(handle_messages))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.calls.lock().unwrap().len()
    }
}

/// Fires its sender when dropped.
struct DropSignal(Option<oneshot::Sender<()>>);

impl Drop for DropSignal {
    fn drop(&mut self) {
        if let Some(tx) = self.0.take() {
            let _ = tx.send(());
        }
    }
}

async fn handle_messages(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state
        .calls
        .lock()
        .unwrap()
        .push(RecordedCall { headers, body });

    match &state.reply {
        Reply::Fixed {
            status,
            headers,
            body,
        } => {
            let mut builder = Response::builder()
                .status(*status)
                .header(header::CONTENT_TYPE, "application/json");
            for (name, value) in headers {
                builder = builder.header(*name, *value);
            }
            builder.body(Body::from(body.clone())).unwrap()
        }
        Reply::Stream(slot) => {
            let (rx, dropped) = slot
                .lock()
                .unwrap()
                .take()
                .expect("streaming mock serves a single call");
            let stream = futures_util::stream::unfold(
                (rx, DropSignal(Some(dropped))),
                |(mut rx, signal)| async move {
                    rx.recv()
                        .await
                        .map(|chunk| (Ok::<_, Infallible>(chunk), (rx, signal)))
                },
            );
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/event-stream")
                .body(Body::from_stream(stream))
                .unwrap()
        }
    }
}

/// Relay config pointing at `upstream_url` with the test key.
pub fn relay_config(upstream_url: &str) -> RelayConfig {
    RelayConfig::default()
        .with_api_key(TEST_API_KEY)
        .with_upstream_url(upstream_url)
        .with_model(TEST_MODEL)
        .with_max_tokens(TEST_MAX_TOKENS)
        .with_connect_timeout(Duration::from_secs(2))
}

pub fn relay_state(config: RelayConfig) -> AppState {
    Arc::new(RelayState::new(config).unwrap())
}

/// Router under test pointing at `upstream_url`.
pub fn relay_app(upstream_url: &str) -> Router {
    create_router(relay_state(relay_config(upstream_url)))
}

/// A URL nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Send a JSON POST to `/` through the router.
pub async fn post_json(app: Router, body: &Value) -> Response {
    send(app, Method::POST, "/", Body::from(body.to_string())).await
}

pub async fn send(app: Router, method: Method, uri: &str, body: Body) -> Response {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Read exactly `len` bytes from a streaming body, failing after five seconds.
pub async fn read_exact(body: &mut Body, len: usize) -> Bytes {
    let mut buf = BytesMut::new();
    while buf.len() < len {
        let frame = tokio::time::timeout(Duration::from_secs(5), body.frame())
            .await
            .expect("timed out waiting for a body frame")
            .expect("body ended early")
            .expect("body error");
        if let Ok(data) = frame.into_data() {
            buf.extend_from_slice(&data);
        }
    }
    buf.freeze()
}

/// A completion body in the upstream's buffered format.
pub fn completion(text: &str) -> Value {
    serde_json::json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn"
    })
}
