//! Mock translation backend for integration tests
//!
//! Replies to `POST /v1/translateHtml` with a scripted outcome and records
//! every payload and header set it receives.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Router, routing};
use tokio_util::sync::CancellationToken;

/// Outcome returned for every request
#[derive(Clone)]
pub enum Reply {
    /// 200 with a JSON body
    Json(serde_json::Value),
    /// 200 with an arbitrary body
    Raw(&'static str),
    /// Non-success status with a text body
    Status(u16, &'static str),
    /// Wait before answering with JSON
    Delayed(Duration, serde_json::Value),
}

pub struct MockUpstream {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    reply: Reply,
    payloads: Mutex<Vec<serde_json::Value>>,
    headers: Mutex<Vec<HeaderMap>>,
}

impl MockUpstream {
    /// Start the mock server, returning immediately
    pub async fn start(reply: Reply) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            reply,
            payloads: Mutex::new(Vec::new()),
            headers: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/translateHtml", routing::post(handle_translate))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Endpoint to configure as `translate.base_url`
    pub fn url(&self) -> String {
        format!("http://{}/v1/translateHtml", self.addr)
    }

    /// Decoded payloads received so far
    pub fn payloads(&self) -> Vec<serde_json::Value> {
        self.state.payloads.lock().unwrap().clone()
    }

    /// Header sets received so far
    pub fn headers(&self) -> Vec<HeaderMap> {
        self.state.headers.lock().unwrap().clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_translate(State(state): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> Response {
    let payload = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    state.payloads.lock().unwrap().push(payload);
    state.headers.lock().unwrap().push(headers);

    match state.reply.clone() {
        Reply::Json(value) => (StatusCode::OK, value.to_string()).into_response(),
        Reply::Raw(text) => (StatusCode::OK, text).into_response(),
        Reply::Status(code, text) => (StatusCode::from_u16(code).unwrap(), text).into_response(),
        Reply::Delayed(delay, value) => {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, value.to_string()).into_response()
        }
    }
}
