use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use frontdesk_core::{Dashboard, Draft, Outcome};
use tokio::sync::mpsc;

use crate::command::{Command, HELP};

/// What the prompt loop should do after a command was dispatched.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Render,
    Print(String),
    /// A backend workflow is running; its outcome arrives on the finished channel.
    Started,
    Quit,
}

/// Operator-side input state: one answer draft per pending request plus the
/// call-simulation draft. Drafts survive failed submissions.
///
/// Backend workflows run on their own tasks so the prompt keeps reading input
/// and redrawing while a request is outstanding. Drafts are copied out before
/// the await and written back afterwards; no lock is held across a request.
#[derive(Clone)]
pub(crate) struct Session {
    dashboard: Arc<Dashboard>,
    answers: Arc<Mutex<HashMap<String, Draft>>>,
    question: Arc<Mutex<Draft>>,
    finished: mpsc::UnboundedSender<Outcome>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Session {
    pub fn new(dashboard: Arc<Dashboard>) -> (Self, mpsc::UnboundedReceiver<Outcome>) {
        let (finished, rx) = mpsc::unbounded_channel();
        let session = Self {
            dashboard,
            answers: Arc::new(Mutex::new(HashMap::new())),
            question: Arc::new(Mutex::new(Draft::default())),
            finished,
        };
        (session, rx)
    }

    #[cfg(test)]
    pub fn dashboard(&self) -> &Arc<Dashboard> {
        &self.dashboard
    }

    pub async fn execute(&self, command: Command) -> Step {
        match command {
            Command::Tab(tab) => {
                self.dashboard.select_tab(tab).await;
                Step::Render
            }
            Command::Resolve { id, answer } => {
                let draft = {
                    let mut answers = lock(&self.answers);
                    let draft = answers.entry(id.clone()).or_default();
                    if let Some(answer) = answer {
                        draft.set(answer);
                    }
                    draft.clone()
                };
                let session = self.clone();
                self.start(async move { session.resolve(id, draft).await });
                Step::Started
            }
            Command::Call(question) => {
                let draft = {
                    let mut current = lock(&self.question);
                    if let Some(question) = question {
                        current.set(question);
                    }
                    current.clone()
                };
                let session = self.clone();
                self.start(async move { session.call(draft).await });
                Step::Started
            }
            Command::Clear => {
                let session = self.clone();
                self.start(async move {
                    let outcome = session.dashboard.clear_all().await;
                    if outcome == Outcome::Completed {
                        lock(&session.answers).clear();
                    }
                    outcome
                });
                Step::Started
            }
            Command::Refresh => {
                let dashboard = self.dashboard.clone();
                self.start(async move { dashboard.refresh().await });
                Step::Started
            }
            Command::Help => Step::Print(HELP.to_string()),
            Command::Quit => Step::Quit,
        }
    }

    fn start<F>(&self, work: F)
    where
        F: std::future::Future<Output = Outcome> + Send + 'static,
    {
        let finished = self.finished.clone();
        tokio::spawn(async move {
            let outcome = work.await;
            let _ = finished.send(outcome);
        });
    }

    async fn resolve(&self, id: String, mut draft: Draft) -> Outcome {
        let outcome = self.dashboard.resolve(&id, &mut draft).await;
        match outcome {
            Outcome::Completed => {
                lock(&self.answers).remove(&id);
            }
            Outcome::Discarded => {}
            _ => {
                lock(&self.answers).insert(id, draft);
            }
        }
        outcome
    }

    async fn call(&self, mut draft: Draft) -> Outcome {
        let outcome = self.dashboard.simulate_call(&mut draft).await;
        if outcome == Outcome::Completed {
            lock(&self.question).clear();
        }
        outcome
    }

    /// Kept draft for `id`, if an earlier attempt left one behind.
    #[cfg(test)]
    pub fn draft_for(&self, id: &str) -> Option<String> {
        lock(&self.answers)
            .get(id)
            .filter(|d| !d.is_blank())
            .map(|d| d.text().to_string())
    }

    #[cfg(test)]
    pub fn question_draft(&self) -> String {
        lock(&self.question).text().to_string()
    }
}
