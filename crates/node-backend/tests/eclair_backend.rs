//! HTTP tests for the eclair backend against an in-process mock API.

#![cfg(feature = "eclair")]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Json, Router};
use node_backend::{BackendError, ChannelOpenParams, EclairBackend, EclairConfig, NodeBackend};

const NODE_ID: &str = "02eec7245d6b7d2ccb30380bfbe2a3648cd7a942653f5aa340edcea1f283686619";
const PASSWORD: &str = "hunter2";
/// base64("eclair-cli:hunter2")
const EXPECTED_AUTH: &str = "Basic ZWNsYWlyLWNsaTpodW50ZXIy";

/// A request received by the mock API.
#[derive(Debug, Clone)]
struct Recorded {
    command: String,
    form: HashMap<String, String>,
    authorization: Option<String>,
}

#[derive(Clone)]
struct MockEclair {
    requests: Arc<Mutex<Vec<Recorded>>>,
    connect_status: StatusCode,
    open_status: StatusCode,
    getinfo_body: serde_json::Value,
}

impl MockEclair {
    fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            connect_status: StatusCode::OK,
            open_status: StatusCode::OK,
            getinfo_body: serde_json::json!({
                "nodeId": "03864ef025fde8fb587d989186ce6a4a186895ee44a926bfc370e2c366597a3f8f",
                "alias": "vekslak",
                "publicAddresses": ["198.51.100.4:9735"]
            }),
        }
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle(
    State(mock): State<MockEclair>,
    Path(command): Path<String>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let authorization = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    mock.requests.lock().unwrap().push(Recorded {
        command: command.clone(),
        form,
        authorization: authorization.clone(),
    });

    if authorization.as_deref() != Some(EXPECTED_AUTH) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match command.as_str() {
        "getinfo" => Json(mock.getinfo_body.clone()).into_response(),
        "connect" => (mock.connect_status, "connected").into_response(),
        "open" => (mock.open_status, "created channel").into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serve the mock on an ephemeral port and return a backend pointed at it.
async fn start(mock: MockEclair, password: &str) -> EclairBackend {
    let app = Router::new()
        .route("/:command", post(handle))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = EclairConfig::new(format!("http://{}", addr));
    EclairBackend::with_password(config, password).unwrap()
}

#[tokio::test]
async fn test_get_uri() {
    let mock = MockEclair::new();
    let backend = start(mock.clone(), PASSWORD).await;

    let uri = backend.get_uri().await.unwrap();
    assert_eq!(
        uri.as_str(),
        "03864ef025fde8fb587d989186ce6a4a186895ee44a926bfc370e2c366597a3f8f@198.51.100.4:9735"
    );

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization.as_deref(), Some(EXPECTED_AUTH));
}

#[tokio::test]
async fn test_get_uri_without_public_address() {
    let mut mock = MockEclair::new();
    mock.getinfo_body = serde_json::json!({ "nodeId": "03abc", "publicAddresses": [] });
    let backend = start(mock, PASSWORD).await;

    let result = backend.get_uri().await;
    assert!(matches!(result, Err(BackendError::Unavailable(_))));
}

#[tokio::test]
async fn test_get_uri_with_wrong_password() {
    let backend = start(MockEclair::new(), "wrong").await;
    let result = backend.get_uri().await;
    assert!(matches!(result, Err(BackendError::Unavailable(_))));
}

#[tokio::test]
async fn test_get_uri_unreachable() {
    // Nothing listens on port 9 of localhost in test environments.
    let config = EclairConfig::new("http://127.0.0.1:9");
    let backend = EclairBackend::with_password(config, PASSWORD).unwrap();
    let result = backend.get_uri().await;
    assert!(matches!(result, Err(BackendError::Unavailable(_))));
}

#[tokio::test]
async fn test_open_public_channel_without_connect() {
    let mock = MockEclair::new();
    let backend = start(mock.clone(), PASSWORD).await;

    let params = ChannelOpenParams::new(NODE_ID, 100_000, 20_000);
    assert!(backend.open_channel(&params).await);

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    let open = &requests[0];
    assert_eq!(open.command, "open");
    assert_eq!(open.form["nodeId"], NODE_ID);
    assert_eq!(open.form["fundingSatoshis"], "100000");
    assert_eq!(open.form["pushMsat"], "20000000");
    assert_eq!(open.form["fundingFeerateSatByte"], "1");
    assert_eq!(open.form["channelFlags"], "9");
}

#[tokio::test]
async fn test_open_private_channel_with_connect() {
    let mock = MockEclair::new();
    let backend = start(mock.clone(), PASSWORD).await;

    let params = ChannelOpenParams::new(NODE_ID, 250_000, 0)
        .private(true)
        .with_connect_host("203.0.113.9:9735");
    assert!(backend.open_channel(&params).await);

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].command, "connect");
    assert_eq!(requests[0].form["uri"], format!("{}@203.0.113.9:9735", NODE_ID));
    assert_eq!(requests[1].command, "open");
    assert_eq!(requests[1].form["channelFlags"], "8");
    assert_eq!(requests[1].form["pushMsat"], "0");
}

#[tokio::test]
async fn test_failed_connect_aborts_open() {
    let mut mock = MockEclair::new();
    mock.connect_status = StatusCode::INTERNAL_SERVER_ERROR;
    let backend = start(mock.clone(), PASSWORD).await;

    let params =
        ChannelOpenParams::new(NODE_ID, 100_000, 0).with_connect_host("203.0.113.9:9735");
    assert!(!backend.open_channel(&params).await);

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].command, "connect");
}

#[tokio::test]
async fn test_open_rejected_by_node() {
    let mut mock = MockEclair::new();
    mock.open_status = StatusCode::BAD_REQUEST;
    let backend = start(mock, PASSWORD).await;

    let params = ChannelOpenParams::new(NODE_ID, 100_000, 0);
    assert!(!backend.open_channel(&params).await);
}

#[tokio::test]
async fn test_open_with_push_beyond_msat_range_sends_nothing() {
    let mock = MockEclair::new();
    let backend = start(mock.clone(), PASSWORD).await;

    let params = ChannelOpenParams::new(NODE_ID, 100_000, u64::MAX / 500);
    assert!(!backend.open_channel(&params).await);
    assert!(mock.requests().is_empty());
}
