//! Stub WLED device for tests: an axum server on an ephemeral loopback port
//! that answers per method and path and records every request it sees.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct StubResponse {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
}

impl StubResponse {
    pub fn json(value: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: value.to_string(),
            delay: None,
        }
    }

    pub fn text(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn status(code: u16) -> Self {
        Self {
            status: StatusCode::from_u16(code).unwrap(),
            body: String::new(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

struct StubState {
    routes: HashMap<(Method, String), StubResponse>,
    requests: Mutex<Vec<RecordedRequest>>,
}

#[derive(Default)]
pub struct StubBuilder {
    routes: HashMap<(Method, String), StubResponse>,
}

impl StubBuilder {
    pub fn on(mut self, method: Method, path: &str, response: StubResponse) -> Self {
        self.routes.insert((method, path.to_string()), response);
        self
    }

    pub async fn start(self) -> StubDevice {
        let state = Arc::new(StubState {
            routes: self.routes,
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new().fallback(respond).with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        StubDevice { addr, state }
    }
}

async fn respond(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let recorded = RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        body: serde_json::from_slice(&body).ok(),
    };
    state.requests.lock().await.push(recorded);

    let Some(stub) = state.routes.get(&(method, path)).cloned() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if let Some(delay) = stub.delay {
        tokio::time::sleep(delay).await;
    }
    (
        stub.status,
        [(header::CONTENT_TYPE, "application/json")],
        stub.body,
    )
        .into_response()
}

pub struct StubDevice {
    addr: SocketAddr,
    state: Arc<StubState>,
}

impl StubDevice {
    pub fn builder() -> StubBuilder {
        StubBuilder::default()
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().await.clone()
    }

    /// JSON bodies of the recorded requests that carried one, in order.
    pub async fn bodies(&self) -> Vec<Value> {
        self.requests()
            .await
            .into_iter()
            .filter_map(|r| r.body)
            .collect()
    }
}

/// Base URL of a loopback port that refuses connections.
pub async fn unreachable_host() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
