//! Common test utilities for integration tests.
//!
//! Starts an in-process stub of the campus backend on an ephemeral port and
//! records every request it receives.

// Not every helper is used by every test binary.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use campus_gateway::config::{Config, GatewayConfig, LoggingConfig, RetryConfig};
use campus_gateway::Gateway;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::{json, Value};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// One request as seen by the stub backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

#[derive(Default)]
struct StubState {
    recorded: Mutex<Vec<Recorded>>,
    /// Number of upcoming requests to answer with 503.
    fail_next: AtomicUsize,
}

/// A running stub backend.
pub struct StubBackend {
    pub base_url: String,
    state: Arc<StubState>,
}

impl StubBackend {
    /// Bind to an ephemeral port and serve in the background.
    pub async fn start() -> Self {
        let state = Arc::new(StubState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub backend");
        let addr = listener.local_addr().expect("Failed to read stub address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Stub backend failed");
        });

        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.recorded.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("No request recorded")
    }

    /// Answer the next `n` requests with 503 Service Unavailable.
    pub fn fail_next(&self, n: usize) {
        self.state.fail_next.store(n, Ordering::SeqCst);
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body = serde_json::from_slice::<Value>(&body).ok();
    state.recorded.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body: body.clone(),
    });

    let failing = state
        .fail_next
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if failing {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    let Some(path) = uri.path().strip_prefix("/api") else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();

    match (method, segments.as_slice()) {
        (Method::GET, ["dashboard", "metrics"]) => ok(json!({
            "activeUsers": 1247,
            "tokensUsed": 2_400_000,
            "systemUptime": 99.8,
            "courseCompletion": 87.3,
            "totalUsers": 3500,
            "newRegistrations": 42,
            "criticalAlerts": 2
        })),
        (Method::GET, ["ai", "usage"]) => ok(json!([{
            "timestamp": "2024-03-01T10:00:00Z",
            "tokens": 1500,
            "cost": 0.03,
            "provider": "openai",
            "department": "Physics",
            "userId": "TCH004"
        }])),
        (Method::GET, ["tokens", "quotas"]) => ok(json!([
            {"userId": "STU001", "quota": 10000, "used": 2500}
        ])),
        (Method::PUT, ["tokens", "quota", _]) => StatusCode::NO_CONTENT.into_response(),
        (Method::GET, ["system", "health"]) => ok(json!([{
            "name": "AI Gateway",
            "status": "healthy",
            "responseTime": "120ms",
            "uptime": "99.9%",
            "lastChecked": "2 minutes ago"
        }])),
        (Method::GET, ["system", "status"]) => ok(json!({"status": "operational", "uptime": 99.95})),
        (Method::GET, ["users"]) => ok(json!({
            "users": [user_json("STU001"), user_json("STU002")],
            "total": 2,
            "pages": 1
        })),
        (Method::GET, ["users", "STU999"]) => (StatusCode::NOT_FOUND, "no such user").into_response(),
        (Method::GET, ["users", id]) => ok(user_json(id)),
        (Method::PUT, ["users", id]) => {
            let mut user = user_json(id);
            if let (Some(fields), Some(Value::Object(changes))) = (user.as_object_mut(), body) {
                fields.extend(changes);
            }
            ok(user)
        }
        (Method::DELETE, ["users", _]) => StatusCode::NO_CONTENT.into_response(),
        (Method::GET, ["activity"]) => ok(json!([{
            "id": "act-1",
            "type": "user_login",
            "user": "amara.okafor@campus.edu",
            "action": "Signed in",
            "timestamp": "2024-03-01T09:30:00Z",
            "severity": "info"
        }])),
        (Method::GET, ["auth", "verify"]) => ok(json!({
            "user": user_json("ADM001"),
            "permissions": ["users:write"]
        })),
        (Method::GET, ["accessibility", "report"]) => ok(json!({
            "pageUrl": "/dashboard",
            "violations": [],
            "score": 100.0,
            "lastChecked": "2024-03-01T12:00:00Z"
        })),
        (Method::POST, ["accessibility", "validate"]) => {
            let url = body.and_then(|b| b.get("url").cloned()).unwrap_or(Value::Null);
            ok(json!({"url": url, "valid": true}))
        }
        (Method::GET, ["migration", "status"]) => ok(json!({"phase": "done", "progress": 1.0})),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn ok(body: Value) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

/// A realistic user record with generated name and email.
pub fn user_json(id: &str) -> Value {
    let name: String = Name().fake();
    let email: String = SafeEmail().fake();
    json!({
        "id": id,
        "name": name,
        "email": email,
        "role": "student",
        "department": "Computer Science",
        "isActive": true,
        "lastLogin": "2024-03-01T08:15:00Z",
        "tokenQuota": 10000,
        "tokenUsage": 2500,
        "createdAt": "2023-09-01T00:00:00Z"
    })
}

/// Base URL of a port nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read listener address");
    drop(listener);
    format!("http://{}/api", addr)
}

/// Test configuration pointing at `base_url`, with fast retries.
pub fn test_config(base_url: &str) -> Config {
    Config {
        gateway: GatewayConfig {
            base_url: base_url.to_string(),
            timeout_ms: 5_000,
            ..Default::default()
        },
        retry: RetryConfig {
            base_backoff_ms: 1,
            max_backoff_ms: 5,
            ..Default::default()
        },
        logging: LoggingConfig::default(),
    }
}

pub fn test_gateway(base_url: &str) -> Gateway {
    Gateway::from_config(&test_config(base_url)).expect("Failed to build gateway")
}

/// Counts ERROR events emitted by the gateway library.
#[derive(Clone, Default)]
pub struct ErrorCounter {
    count: Arc<AtomicUsize>,
}

impl ErrorCounter {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() == Level::ERROR && metadata.target().starts_with("campus_gateway") {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Default-header map for [`GatewayConfig::default_headers`].
pub fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
