//! In-process mock of the todo service for the behavioral test suite.
//!
//! # Design
//! The real server is out of scope; tests need a double they can steer.
//! [`ServerState`] is a cloneable handle shared between the axum app and
//! the test: seed the served list, force a failure status, delay
//! responses, and read back the request count and the `Authorization`
//! headers seen so far. Handlers never await while holding a lock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;

pub use axum::http::StatusCode;

/// A todo item as served over the wire (camelCase JSON).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub is_completed: bool,
}

/// The fixture list most tests seed the server with.
pub fn sample_todos() -> Vec<Todo> {
    vec![
        Todo {
            id: 1,
            title: "Buy milk".to_string(),
            is_completed: false,
        },
        Todo {
            id: 2,
            title: "Walk the dog".to_string(),
            is_completed: true,
        },
    ]
}

#[derive(Default)]
struct Inner {
    todos: RwLock<Vec<Todo>>,
    fail_status: RwLock<Option<StatusCode>>,
    delay: RwLock<Option<Duration>>,
    hits: AtomicUsize,
    auth_headers: Mutex<Vec<Option<String>>>,
}

/// Shared handle steering the mock and exposing what it observed.
#[derive(Clone, Default)]
pub struct ServerState(Arc<Inner>);

impl ServerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State pre-seeded with `todos`.
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let state = Self::default();
        state.seed(todos);
        state
    }

    /// Replace the served todo list.
    pub fn seed(&self, todos: Vec<Todo>) {
        *self
            .0
            .todos
            .write()
            .unwrap_or_else(PoisonError::into_inner) = todos;
    }

    /// Make every request answer with `status` and a JSON error body.
    pub fn fail_with(&self, status: StatusCode) {
        *self
            .0
            .fail_status
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(status);
    }

    /// Stop forcing failures; requests succeed again.
    pub fn recover(&self) {
        *self
            .0
            .fail_status
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Hold every response for `delay` before answering.
    pub fn delay_responses(&self, delay: Duration) {
        *self
            .0
            .delay
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(delay);
    }

    /// Requests served so far.
    pub fn hits(&self) -> usize {
        self.0.hits.load(Ordering::SeqCst)
    }

    /// `Authorization` header of each request, in arrival order.
    pub fn auth_headers(&self) -> Vec<Option<String>> {
        self.0
            .auth_headers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn observe(&self, headers: &HeaderMap) {
        self.0.hits.fetch_add(1, Ordering::SeqCst);
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.0
            .auth_headers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(auth);
    }

    fn forced_failure(&self) -> Option<StatusCode> {
        *self
            .0
            .fail_status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn delay(&self) -> Option<Duration> {
        *self.0.delay.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn todos(&self) -> Vec<Todo> {
        self.0
            .todos
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

pub fn app(state: ServerState) -> Router {
    Router::new()
        .route("/todos", get(list_todos))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: ServerState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn list_todos(State(state): State<ServerState>, headers: HeaderMap) -> Response {
    state.observe(&headers);

    if let Some(delay) = state.delay() {
        tokio::time::sleep(delay).await;
    }

    if let Some(status) = state.forced_failure() {
        tracing::debug!(status = status.as_u16(), "serving forced failure");
        let message = status.canonical_reason().unwrap_or("request failed");
        return (status, Json(json!({ "error": message }))).into_response();
    }

    Json(state.todos()).into_response()
}
