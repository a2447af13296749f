use std::sync::Arc;
use std::time::Duration;

use frontdesk_protocol::CallRequest;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backend::{Backend, BackendError};
use crate::capability::{Announcer, Notifier, SilentAnnouncer, TracingNotifier};
use crate::config::DEFAULT_CALLER_ID;
use crate::inflight::InFlight;
use crate::poll::{fetch_snapshot, spawn_poller, PollHandle};
use crate::state::{DashboardState, Statistics};
use crate::Tab;

pub mod messages {
    pub const LOAD_FAILED: &str = "Failed to load data";
    pub const ANSWER_REQUIRED: &str = "Please enter an answer first";
    pub const RESOLVED: &str = "Request resolved and learned!";
    pub const RESOLVE_FAILED: &str = "Failed to resolve request!";
    pub const SERVER_UNREACHABLE: &str = "Server not responding!";
    pub const QUESTION_REQUIRED: &str = "Enter a question first!";
    pub const SIMULATING: &str = "Simulating AI call...";
    pub const CALL_FAILED: &str = "Something went wrong.";
    pub const CLEARED: &str = "All data cleared successfully!";
    pub const CLEAR_FAILED: &str = "Failed to clear data!";
    pub const BUSY: &str = "Already in progress, please wait";
}

/// How a workflow attempt ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Backend call succeeded and local state was updated.
    Completed,
    /// Input failed validation; no network call was made.
    Rejected,
    /// The same operation is already outstanding; no network call was made.
    Busy,
    /// Backend or transport failure; local state untouched.
    Failed,
    /// The dashboard was torn down before the result arrived.
    Discarded,
}

/// Operator-typed text bound to one input box.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Draft {
    text: String,
}

impl Draft {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// The dashboard session: cached state plus the workflows that mutate it.
pub struct Dashboard {
    backend: Arc<dyn Backend>,
    notifier: Arc<dyn Notifier>,
    announcer: Arc<dyn Announcer>,
    state: RwLock<DashboardState>,
    inflight: InFlight,
    lifetime: CancellationToken,
    caller_id: String,
}

impl Dashboard {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            notifier: Arc::new(TracingNotifier),
            announcer: Arc::new(SilentAnnouncer),
            state: RwLock::new(DashboardState::new()),
            inflight: InFlight::new(),
            lifetime: CancellationToken::new(),
            caller_id: DEFAULT_CALLER_ID.to_string(),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_announcer(mut self, announcer: Arc<dyn Announcer>) -> Self {
        self.announcer = announcer;
        self
    }

    pub fn with_caller_id(mut self, caller_id: impl Into<String>) -> Self {
        self.caller_id = caller_id.into();
        self
    }

    pub fn caller_id(&self) -> &str {
        &self.caller_id
    }

    pub(crate) fn lifetime(&self) -> &CancellationToken {
        &self.lifetime
    }

    /// Start the periodic refresh (immediately, then every `period`).
    pub fn start_polling(self: &Arc<Self>, period: Duration) -> PollHandle {
        spawn_poller(Arc::clone(self), period)
    }

    /// Tear the view down: stops polling and makes every in-flight workflow
    /// drop its result.
    pub fn teardown(&self) {
        self.lifetime.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    /// Copy of the current session state.
    pub async fn view(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    pub async fn statistics(&self) -> Statistics {
        self.state.read().await.statistics()
    }

    pub async fn active_tab(&self) -> Tab {
        self.state.read().await.active_tab()
    }

    pub async fn select_tab(&self, tab: Tab) {
        self.state.write().await.select_tab(tab);
    }

    /// One poll cycle. All-or-nothing: a failure in either fetch leaves the
    /// previous state in place.
    pub async fn refresh(&self) -> Outcome {
        self.state.write().await.set_loading(true);
        let result = fetch_snapshot(self.backend.as_ref()).await;
        if self.is_torn_down() {
            return Outcome::Discarded;
        }
        match result {
            Ok(snapshot) => {
                let mut state = self.state.write().await;
                debug!(
                    pending = snapshot.pending.len(),
                    learned = snapshot.learned.len(),
                    "applied snapshot"
                );
                state.apply_snapshot(snapshot);
                state.set_loading(false);
                Outcome::Completed
            }
            Err(err) => {
                self.state.write().await.set_loading(false);
                warn!(error = %err, "refresh failed; keeping previous snapshot");
                self.notifier.notify(messages::LOAD_FAILED);
                Outcome::Failed
            }
        }
    }

    /// Submit `draft` as the answer to pending request `id`.
    ///
    /// On success the request leaves the pending list, the backend's
    /// question/answer is appended to the resolved list and the draft is
    /// cleared. On failure nothing changes and the draft is kept.
    pub async fn resolve(&self, id: &str, draft: &mut Draft) -> Outcome {
        if draft.is_blank() {
            self.notifier.notify(messages::ANSWER_REQUIRED);
            return Outcome::Rejected;
        }
        let Some(_guard) = self.inflight.try_begin(&format!("resolve:{id}")) else {
            self.notifier.notify(messages::BUSY);
            return Outcome::Busy;
        };

        let result = self.backend.resolve(id, draft.text()).await;
        if self.is_torn_down() {
            return Outcome::Discarded;
        }
        match result {
            Ok(resp) => {
                let entry = resp.into_resolved();
                let spoken = format!("Got it! {}", entry.answer);
                self.state.write().await.apply_resolution(id, entry);
                self.announcer.announce(&spoken);
                self.notifier.notify(messages::RESOLVED);
                draft.clear();
                info!(request_id = id, "request resolved");
                Outcome::Completed
            }
            Err(err) => {
                warn!(request_id = id, error = %err, "resolve failed");
                self.notifier.notify(failure_message(&err, messages::RESOLVE_FAILED));
                Outcome::Failed
            }
        }
    }

    /// Place a synthetic call with `draft` as the caller's question.
    pub async fn simulate_call(&self, draft: &mut Draft) -> Outcome {
        if draft.is_blank() {
            self.notifier.notify(messages::QUESTION_REQUIRED);
            return Outcome::Rejected;
        }
        let Some(_guard) = self.inflight.try_begin("call") else {
            self.notifier.notify(messages::BUSY);
            return Outcome::Busy;
        };

        self.notifier.notify(messages::SIMULATING);
        let request = CallRequest {
            caller_id: self.caller_id.clone(),
            question: draft.text().to_string(),
        };
        let result = self.backend.call(&request).await;
        if self.is_torn_down() {
            return Outcome::Discarded;
        }
        match result {
            Ok(resp) => {
                self.notifier.notify(&resp.response_text);
                if let Some(audio) = resp.audio_file.as_deref().filter(|a| !a.is_empty()) {
                    self.announcer.play(&self.backend.resource_url(audio));
                }
                draft.clear();
                info!(caller_id = %self.caller_id, "call simulated");
                // re-poll now rather than waiting for the next tick
                self.refresh().await;
                Outcome::Completed
            }
            Err(err) => {
                warn!(error = %err, "call simulation failed");
                self.notifier.notify(messages::CALL_FAILED);
                Outcome::Failed
            }
        }
    }

    /// Wipe every pending request and learned answer on the backend.
    pub async fn clear_all(&self) -> Outcome {
        let Some(_guard) = self.inflight.try_begin("clear") else {
            self.notifier.notify(messages::BUSY);
            return Outcome::Busy;
        };
        let result = self.backend.clear().await;
        if self.is_torn_down() {
            return Outcome::Discarded;
        }
        match result {
            Ok(()) => {
                self.state.write().await.clear();
                self.notifier.notify(messages::CLEARED);
                info!("backend data cleared");
                Outcome::Completed
            }
            Err(err) => {
                warn!(error = %err, "clear failed");
                self.notifier.notify(messages::CLEAR_FAILED);
                Outcome::Failed
            }
        }
    }
}

fn failure_message(err: &BackendError, status_message: &'static str) -> &'static str {
    match err {
        BackendError::Status { .. } => status_message,
        BackendError::Transport(_) | BackendError::Decode(_) => messages::SERVER_UNREACHABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Failure, RecordingAnnouncer, RecordingNotifier, ScriptedBackend};
    use frontdesk_protocol::{CallResponse, PendingRequest, ResolveResponse, ResolvedAnswer};

    struct Harness {
        backend: Arc<ScriptedBackend>,
        notifier: Arc<RecordingNotifier>,
        announcer: Arc<RecordingAnnouncer>,
        dashboard: Arc<Dashboard>,
    }

    fn harness(backend: ScriptedBackend) -> Harness {
        let backend = Arc::new(backend);
        let notifier = Arc::new(RecordingNotifier::default());
        let announcer = Arc::new(RecordingAnnouncer::default());
        let dashboard = Arc::new(
            Dashboard::new(backend.clone())
                .with_notifier(notifier.clone())
                .with_announcer(announcer.clone()),
        );
        Harness {
            backend,
            notifier,
            announcer,
            dashboard,
        }
    }

    fn closing_time() -> ScriptedBackend {
        ScriptedBackend::new().with_pending(vec![PendingRequest::new(
            "1",
            "What time do you close?",
        )])
    }

    #[tokio::test]
    async fn resolve_moves_request_and_clears_draft() {
        let h = harness(closing_time());
        assert_eq!(h.dashboard.refresh().await, Outcome::Completed);

        let mut draft = Draft::new("We close at 9 PM");
        assert_eq!(h.dashboard.resolve("1", &mut draft).await, Outcome::Completed);

        let view = h.dashboard.view().await;
        assert!(view.pending().is_empty());
        assert_eq!(
            view.resolved(),
            &[ResolvedAnswer::new("What time do you close?", "We close at 9 PM")]
        );
        assert_eq!(draft.text(), "");
        assert_eq!(h.announcer.spoken(), vec!["Got it! We close at 9 PM"]);
        assert_eq!(h.notifier.last().as_deref(), Some(messages::RESOLVED));
    }

    #[tokio::test]
    async fn resolved_entry_takes_question_and_answer_from_backend_reply() {
        let h = harness(
            ScriptedBackend::new()
                .with_pending(vec![PendingRequest::new("1", "Hours?")])
                .with_resolve_reply(ResolveResponse {
                    message: Some("Request resolved".into()),
                    question: "What are your hours?".into(),
                    answer: "9 to 5, Monday to Friday".into(),
                }),
        );
        h.dashboard.refresh().await;

        let mut draft = Draft::new("9-5 weekdays");
        assert_eq!(h.dashboard.resolve("1", &mut draft).await, Outcome::Completed);

        let view = h.dashboard.view().await;
        assert!(view.pending().is_empty());
        assert_eq!(
            view.resolved(),
            &[ResolvedAnswer::new(
                "What are your hours?",
                "9 to 5, Monday to Friday"
            )]
        );
        assert_eq!(h.announcer.spoken(), vec!["Got it! 9 to 5, Monday to Friday"]);
    }

    #[tokio::test]
    async fn resolve_failure_keeps_state_and_draft() {
        let h = harness(closing_time());
        h.dashboard.refresh().await;
        h.backend.fail("resolve", Failure::Status(500));

        let mut draft = Draft::new("We close at 9 PM");
        assert_eq!(h.dashboard.resolve("1", &mut draft).await, Outcome::Failed);

        let view = h.dashboard.view().await;
        assert_eq!(view.pending().len(), 1);
        assert!(view.resolved().is_empty());
        assert_eq!(draft.text(), "We close at 9 PM");
        assert!(h.announcer.spoken().is_empty());
        assert_eq!(h.notifier.last().as_deref(), Some(messages::RESOLVE_FAILED));

        h.backend.fail("resolve", Failure::Transport);
        assert_eq!(h.dashboard.resolve("1", &mut draft).await, Outcome::Failed);
        assert_eq!(
            h.notifier.last().as_deref(),
            Some(messages::SERVER_UNREACHABLE)
        );
        assert_eq!(draft.text(), "We close at 9 PM");
    }

    #[tokio::test]
    async fn blank_input_never_reaches_backend() {
        let h = harness(closing_time());
        let mut answer = Draft::new("   \t");
        assert_eq!(h.dashboard.resolve("1", &mut answer).await, Outcome::Rejected);
        let mut question = Draft::default();
        assert_eq!(
            h.dashboard.simulate_call(&mut question).await,
            Outcome::Rejected
        );
        assert!(h.backend.calls().is_empty());
        assert_eq!(
            h.notifier.messages(),
            vec![messages::ANSWER_REQUIRED, messages::QUESTION_REQUIRED]
        );
    }

    #[tokio::test]
    async fn refresh_is_all_or_nothing() {
        let h = harness(closing_time().with_learned([("Do you deliver?", "Yes")]));
        h.dashboard.refresh().await;

        h.backend.push_pending(PendingRequest::new("2", "Parking?"));
        h.backend.fail("learned", Failure::Status(503));
        assert_eq!(h.dashboard.refresh().await, Outcome::Failed);
        let view = h.dashboard.view().await;
        assert_eq!(view.pending().len(), 1, "pending list not partially updated");
        assert_eq!(view.resolved().len(), 1);
        assert_eq!(h.notifier.last().as_deref(), Some(messages::LOAD_FAILED));

        h.backend.heal("learned");
        h.backend.fail("requests", Failure::Transport);
        assert_eq!(h.dashboard.refresh().await, Outcome::Failed);
        assert_eq!(h.dashboard.view().await.pending().len(), 1);

        h.backend.heal("requests");
        assert_eq!(h.dashboard.refresh().await, Outcome::Completed);
        assert_eq!(h.dashboard.view().await.pending().len(), 2);
    }

    #[tokio::test]
    async fn learned_mapping_becomes_resolved_view() {
        let h = harness(
            ScriptedBackend::new().with_learned([("Do you deliver?", "Yes, within 5 miles")]),
        );
        h.dashboard.refresh().await;
        let view = h.dashboard.view().await;
        assert_eq!(
            view.resolved(),
            &[ResolvedAnswer::new("Do you deliver?", "Yes, within 5 miles")]
        );
    }

    #[tokio::test]
    async fn poll_after_resolve_leaves_lists_disjoint() {
        let h = harness(
            closing_time().with_learned([("Do you deliver?", "Yes")]),
        );
        h.dashboard.refresh().await;
        let mut draft = Draft::new("9 PM");
        h.dashboard.resolve("1", &mut draft).await;
        h.dashboard.refresh().await;

        let view = h.dashboard.view().await;
        assert!(view.pending().is_empty());
        assert_eq!(view.resolved().len(), 2);
        for req in view.pending() {
            assert!(view.resolved().iter().all(|r| r.question != req.question));
        }
    }

    #[tokio::test]
    async fn duplicate_resolve_is_ignored_while_outstanding() {
        let h = harness(closing_time());
        h.dashboard.refresh().await;
        let gate = h.backend.hold_resolves();

        let first = {
            let dashboard = h.dashboard.clone();
            tokio::spawn(async move {
                let mut draft = Draft::new("9 PM");
                let outcome = dashboard.resolve("1", &mut draft).await;
                (outcome, draft)
            })
        };
        while h.backend.count("POST /requests/1/resolve") == 0 {
            tokio::task::yield_now().await;
        }

        let mut second = Draft::new("10 PM");
        assert_eq!(h.dashboard.resolve("1", &mut second).await, Outcome::Busy);
        assert_eq!(second.text(), "10 PM");
        assert_eq!(h.backend.count("POST /requests/1/resolve"), 1);

        gate.notify_one();
        let (outcome, draft) = first.await.expect("join");
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(draft.text(), "");
    }

    #[tokio::test]
    async fn result_after_teardown_is_discarded() {
        let h = harness(closing_time());
        h.dashboard.refresh().await;
        let gate = h.backend.hold_resolves();

        let pending = {
            let dashboard = h.dashboard.clone();
            tokio::spawn(async move {
                let mut draft = Draft::new("9 PM");
                dashboard.resolve("1", &mut draft).await
            })
        };
        while h.backend.count("POST /requests/1/resolve") == 0 {
            tokio::task::yield_now().await;
        }
        h.dashboard.teardown();
        gate.notify_one();

        assert_eq!(pending.await.expect("join"), Outcome::Discarded);
        assert_eq!(h.dashboard.view().await.pending().len(), 1);
        assert_eq!(h.dashboard.refresh().await, Outcome::Discarded);
    }

    #[tokio::test]
    async fn simulate_call_without_audio_clears_input_and_refreshes() {
        let h = harness(ScriptedBackend::new().with_call_reply(CallResponse {
            response_text: "Yes, 10 to 6".into(),
            audio_file: None,
        }));
        let mut question = Draft::new("Are you open Sunday?");
        assert_eq!(
            h.dashboard.simulate_call(&mut question).await,
            Outcome::Completed
        );
        assert_eq!(question.text(), "");
        assert!(h.announcer.played().is_empty());
        assert_eq!(
            h.notifier.messages(),
            vec![messages::SIMULATING, "Yes, 10 to 6"]
        );
        assert_eq!(
            h.backend.calls(),
            vec!["POST /call", "GET /requests", "GET /learned"]
        );
    }

    #[tokio::test]
    async fn simulate_call_plays_resolved_audio_url() {
        let h = harness(ScriptedBackend::new().with_call_reply(CallResponse {
            response_text: "Let me check".into(),
            audio_file: Some("/audio/dashboard_user.mp3".into()),
        }));
        let mut question = Draft::new("Do you sell gift cards?");
        h.dashboard.simulate_call(&mut question).await;
        assert_eq!(
            h.announcer.played(),
            vec!["http://backend.test/audio/dashboard_user.mp3"]
        );
    }

    #[tokio::test]
    async fn simulate_call_failure_keeps_input() {
        let h = harness(ScriptedBackend::new());
        h.backend.fail("call", Failure::Status(500));
        let mut question = Draft::new("Are you open Sunday?");
        assert_eq!(
            h.dashboard.simulate_call(&mut question).await,
            Outcome::Failed
        );
        assert_eq!(question.text(), "Are you open Sunday?");
        assert_eq!(h.notifier.last().as_deref(), Some(messages::CALL_FAILED));
        assert_eq!(h.backend.calls(), vec!["POST /call"]);
    }

    #[tokio::test]
    async fn clear_empties_lists_only_on_success() {
        let h = harness(closing_time().with_learned([("q", "a")]));
        h.dashboard.refresh().await;

        h.backend.fail("clear", Failure::Transport);
        assert_eq!(h.dashboard.clear_all().await, Outcome::Failed);
        assert_eq!(h.dashboard.view().await.pending().len(), 1);

        h.backend.heal("clear");
        assert_eq!(h.dashboard.clear_all().await, Outcome::Completed);
        let view = h.dashboard.view().await;
        assert!(view.pending().is_empty());
        assert!(view.resolved().is_empty());
        assert_eq!(h.notifier.last().as_deref(), Some(messages::CLEARED));
    }

    #[tokio::test]
    async fn statistics_follow_session_state() {
        let h = harness(closing_time().with_learned([("a", "1"), ("b", "2")]));
        h.dashboard.refresh().await;
        h.dashboard.select_tab(Tab::Statistics).await;
        assert_eq!(h.dashboard.active_tab().await, Tab::Statistics);
        let stats = h.dashboard.statistics().await;
        assert_eq!((stats.resolved, stats.pending), (2, 1));
    }
}
