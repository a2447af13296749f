//! Stand-in for the supervisor backend.
//!
//! Keeps pending requests and the learned mapping in memory and serves the
//! same HTTP/JSON contract the dashboard and the proxy expect.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use frontdesk_protocol::{
    CallRequest, CallResponse, LearnedMapping, MessageResponse, NewRequest, PendingRequest,
    ResolveRequest, ResolveResponse, TokenResponse,
};
use serde_json::json;
use tracing::info;

pub const HOLD_MESSAGE: &str = "Let me check with my supervisor and get back to you.";

#[derive(Default)]
struct Inner {
    pending: Vec<PendingRequest>,
    learned: LearnedMapping,
    next_id: u64,
}

/// Shared in-memory store; clones see the same data.
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<Mutex<Inner>>,
}

impl Store {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn create_request(&self, question: &str, caller_id: Option<&str>) -> PendingRequest {
        let mut inner = self.lock();
        inner.next_id += 1;
        let mut request = PendingRequest::new(format!("req_{}", inner.next_id), question)
            .with_context("status", json!("pending"))
            .with_context(
                "timestamp",
                json!(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            );
        if let Some(caller) = caller_id {
            request = request.with_context("caller_id", json!(caller));
        }
        inner.pending.push(request.clone());
        request
    }

    pub fn pending(&self) -> Vec<PendingRequest> {
        self.lock().pending.clone()
    }

    pub fn learned(&self) -> LearnedMapping {
        self.lock().learned.clone()
    }

    pub fn learn(&self, question: &str, answer: &str) {
        self.lock().learned.insert(question, answer);
    }

    /// Move a pending request into the learned mapping.
    pub fn resolve(&self, id: &str, answer: &str) -> Option<ResolveResponse> {
        let mut inner = self.lock();
        let pos = inner.pending.iter().position(|r| r.id == id)?;
        let request = inner.pending.remove(pos);
        inner.learned.insert(request.question.clone(), answer);
        Some(ResolveResponse {
            message: Some("Request resolved".to_string()),
            question: request.question,
            answer: answer.to_string(),
        })
    }

    /// Answer from the learned mapping when the exact question is known;
    /// otherwise file a pending request for a supervisor.
    pub fn call(&self, call: &CallRequest) -> CallResponse {
        if let Some(answer) = self.lock().learned.get(&call.question) {
            return CallResponse {
                response_text: answer.to_string(),
                audio_file: None,
            };
        }
        let request = self.create_request(&call.question, Some(&call.caller_id));
        info!(request_id = %request.id, question = %call.question, "supervisor help requested");
        CallResponse {
            response_text: HOLD_MESSAGE.to_string(),
            audio_file: None,
        }
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.pending.clear();
        inner.learned = LearnedMapping::new();
    }
}

pub fn router(store: Store) -> Router {
    Router::new()
        .route("/requests", get(list_requests).post(create_request))
        .route("/requests/{id}/resolve", post(resolve_request))
        .route("/learned", get(learned))
        .route("/call", post(call))
        .route("/clear", post(clear))
        .route("/livekit/token/{identity}/{room}", get(livekit_token))
        .with_state(store)
}

async fn list_requests(State(store): State<Store>) -> Json<Vec<PendingRequest>> {
    Json(store.pending())
}

async fn create_request(
    State(store): State<Store>,
    Json(body): Json<NewRequest>,
) -> (StatusCode, Json<PendingRequest>) {
    let created = store.create_request(&body.question, body.caller_id.as_deref());
    (StatusCode::CREATED, Json(created))
}

async fn resolve_request(
    State(store): State<Store>,
    Path(id): Path<String>,
    Json(body): Json<ResolveRequest>,
) -> Response {
    match store.resolve(&id, &body.answer) {
        Some(resolved) => {
            info!(request_id = %id, "request resolved");
            Json(resolved).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Request not found"})),
        )
            .into_response(),
    }
}

async fn learned(State(store): State<Store>) -> Json<LearnedMapping> {
    Json(store.learned())
}

async fn call(State(store): State<Store>, Json(body): Json<CallRequest>) -> Json<CallResponse> {
    Json(store.call(&body))
}

async fn clear(State(store): State<Store>) -> Json<MessageResponse> {
    store.clear();
    Json(MessageResponse {
        message: "All data cleared successfully!".to_string(),
    })
}

async fn livekit_token(Path((identity, room)): Path<(String, String)>) -> Json<TokenResponse> {
    Json(TokenResponse {
        token: format!("mock.{identity}.{room}"),
    })
}
