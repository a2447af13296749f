use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::backend::{Backend, BackendError};
use crate::dashboard::Dashboard;
use crate::state::Snapshot;

/// One poll cycle: both fetches run concurrently and both must finish before
/// anything is returned. Either failure fails the whole cycle.
pub async fn fetch_snapshot(backend: &dyn Backend) -> Result<Snapshot, BackendError> {
    let (pending, learned) = tokio::join!(backend.pending_requests(), backend.learned());
    Ok(Snapshot {
        pending: pending?,
        learned: learned?,
    })
}

/// Periodic refresh task. Dropping the handle stops the timer; a refresh
/// already running finishes on its own.
pub struct PollHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stop the timer and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Refresh immediately, then every `period`, until the handle is stopped or
/// the dashboard is torn down.
pub fn spawn_poller(dashboard: Arc<Dashboard>, period: Duration) -> PollHandle {
    let cancel = dashboard.lifetime().child_token();
    let token = cancel.clone();
    let period = period.max(Duration::from_millis(10));
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    dashboard.refresh().await;
                }
            }
        }
        debug!("poll loop stopped");
    });
    PollHandle {
        cancel,
        task: Some(task),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Failure, ScriptedBackend};
    use frontdesk_protocol::PendingRequest;

    #[tokio::test]
    async fn snapshot_requires_both_fetches() {
        let backend = ScriptedBackend::new()
            .with_pending(vec![PendingRequest::new("1", "a")])
            .with_learned([("q", "a")]);
        let snap = fetch_snapshot(&backend).await.expect("snapshot");
        assert_eq!(snap.pending.len(), 1);
        assert_eq!(snap.learned.len(), 1);

        backend.fail("learned", Failure::Status(500));
        assert!(fetch_snapshot(&backend).await.is_err());
        // both requests were still issued
        assert_eq!(backend.count("GET /requests"), 2);
        assert_eq!(backend.count("GET /learned"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn poller_refreshes_until_stopped() {
        let backend = Arc::new(ScriptedBackend::new());
        let dashboard = Arc::new(Dashboard::new(backend.clone()));
        let handle = spawn_poller(dashboard.clone(), Duration::from_secs(5));

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(backend.count("GET /requests"), 1, "refresh on start");

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(backend.count("GET /requests"), 2);

        handle.shutdown().await;
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(backend.count("GET /requests"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_stops_poller() {
        let backend = Arc::new(ScriptedBackend::new());
        let dashboard = Arc::new(Dashboard::new(backend.clone()));
        let handle = spawn_poller(dashboard.clone(), Duration::from_secs(5));
        tokio::time::sleep(Duration::from_millis(1)).await;
        dashboard.teardown();
        assert!(handle.is_stopped());
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(backend.count("GET /requests"), 1);
    }
}
