//! In-process doubles for exercising the lifecycle contract without a
//! network, a terminal, or an audio device.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use frontdesk_protocol::{
    CallRequest, CallResponse, LearnedMapping, PendingRequest, ResolveResponse,
};
use tokio::sync::Notify;

use crate::backend::{Backend, BackendError};
use crate::capability::{Announcer, Notifier};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Failure {
    Status(u16),
    Transport,
}

impl Failure {
    fn into_error(self) -> BackendError {
        match self {
            Failure::Status(status) => BackendError::Status {
                status,
                body: r#"{"error":"scripted"}"#.to_string(),
            },
            Failure::Transport => BackendError::Transport("connection refused".to_string()),
        }
    }
}

#[derive(Default)]
struct Script {
    pending: Vec<PendingRequest>,
    learned: LearnedMapping,
    call_reply: Option<CallResponse>,
    resolve_reply: Option<ResolveResponse>,
    failures: HashMap<&'static str, Failure>,
    calls: Vec<String>,
}

/// Backend double that behaves like the real service (resolving moves a
/// request into the learned mapping) and records every call it receives.
///
/// Failures are scripted per operation: `"requests"`, `"learned"`,
/// `"resolve"`, `"call"`, `"clear"`.
#[derive(Default)]
pub struct ScriptedBackend {
    script: Mutex<Script>,
    resolve_gate: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pending(self, pending: Vec<PendingRequest>) -> Self {
        self.lock().pending = pending;
        self
    }

    pub fn with_learned<Q, A, I>(self, learned: I) -> Self
    where
        Q: Into<String>,
        A: Into<String>,
        I: IntoIterator<Item = (Q, A)>,
    {
        self.lock().learned = learned.into_iter().collect();
        self
    }

    pub fn with_call_reply(self, reply: CallResponse) -> Self {
        self.lock().call_reply = Some(reply);
        self
    }

    /// Answer resolves with `reply` instead of echoing the local request.
    pub fn with_resolve_reply(self, reply: ResolveResponse) -> Self {
        self.lock().resolve_reply = Some(reply);
        self
    }

    pub fn fail(&self, op: &'static str, failure: Failure) {
        self.lock().failures.insert(op, failure);
    }

    pub fn heal(&self, op: &'static str) {
        self.lock().failures.remove(op);
    }

    /// Make every resolve wait until the returned handle is notified.
    pub fn hold_resolves(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self
            .resolve_gate
            .lock()
            .unwrap_or_else(|p| p.into_inner()) = Some(gate.clone());
        gate
    }

    pub fn push_pending(&self, request: PendingRequest) {
        self.lock().pending.push(request);
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.lock().calls.iter().filter(|c| c.as_str() == call).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn record(&self, call: String, op: &'static str) -> Result<(), BackendError> {
        let mut script = self.lock();
        script.calls.push(call);
        match script.failures.get(op) {
            Some(failure) => Err(failure.into_error()),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl Backend for ScriptedBackend {
    async fn pending_requests(&self) -> Result<Vec<PendingRequest>, BackendError> {
        self.record("GET /requests".into(), "requests")?;
        Ok(self.lock().pending.clone())
    }

    async fn learned(&self) -> Result<LearnedMapping, BackendError> {
        self.record("GET /learned".into(), "learned")?;
        Ok(self.lock().learned.clone())
    }

    async fn resolve(&self, id: &str, answer: &str) -> Result<ResolveResponse, BackendError> {
        self.record(format!("POST /requests/{id}/resolve"), "resolve")?;
        let gate = self
            .resolve_gate
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let mut script = self.lock();
        let Some(pos) = script.pending.iter().position(|r| r.id == id) else {
            return Err(Failure::Status(404).into_error());
        };
        let request = script.pending.remove(pos);
        let reply = script.resolve_reply.clone().unwrap_or_else(|| ResolveResponse {
            message: Some("Request resolved".into()),
            question: request.question,
            answer: answer.to_string(),
        });
        script.learned.insert(reply.question.clone(), reply.answer.clone());
        Ok(reply)
    }

    async fn call(&self, request: &CallRequest) -> Result<CallResponse, BackendError> {
        self.record("POST /call".into(), "call")?;
        let script = self.lock();
        Ok(script.call_reply.clone().unwrap_or_else(|| CallResponse {
            response_text: format!("echo: {}", request.question),
            audio_file: None,
        }))
    }

    async fn clear(&self) -> Result<(), BackendError> {
        self.record("POST /clear".into(), "clear")?;
        let mut script = self.lock();
        script.pending.clear();
        script.learned = LearnedMapping::new();
        Ok(())
    }

    fn resource_url(&self, path: &str) -> String {
        format!("http://backend.test{path}")
    }
}

/// Notifier that keeps every message.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<String> {
        self.messages().pop()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(message.to_string());
    }
}

/// Announcer that keeps every utterance and playback request.
#[derive(Default)]
pub struct RecordingAnnouncer {
    spoken: Mutex<Vec<String>>,
    played: Mutex<Vec<String>>,
}

impl RecordingAnnouncer {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn played(&self) -> Vec<String> {
        self.played.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl Announcer for RecordingAnnouncer {
    fn announce(&self, text: &str) {
        self.spoken
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(text.to_string());
    }

    fn play(&self, audio_url: &str) {
        self.played
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(audio_url.to_string());
    }
}
