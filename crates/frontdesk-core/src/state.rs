use frontdesk_protocol::{LearnedMapping, PendingRequest, ResolvedAnswer};
use serde::Serialize;

use crate::Tab;

/// Result of one successful poll cycle: both fetches, already decoded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub pending: Vec<PendingRequest>,
    pub learned: LearnedMapping,
}

/// Client-side session state. Entirely derived from the last poll plus any
/// optimistic resolutions applied since; never authoritative.
#[derive(Clone, Debug, Default)]
pub struct DashboardState {
    pending: Vec<PendingRequest>,
    resolved: Vec<ResolvedAnswer>,
    active_tab: Tab,
    loading: bool,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[PendingRequest] {
        &self.pending
    }

    pub fn resolved(&self) -> &[ResolvedAnswer] {
        &self.resolved
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn find_pending(&self, id: &str) -> Option<&PendingRequest> {
        self.pending.iter().find(|r| r.id == id)
    }

    /// Replace both lists with the snapshot. Never merges.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.pending = snapshot.pending;
        self.resolved = snapshot.learned.to_resolved();
    }

    /// Optimistic local resolution: drop `id` from pending and append the
    /// entry built from the backend's response. The next poll overwrites it.
    pub fn apply_resolution(&mut self, id: &str, entry: ResolvedAnswer) {
        self.pending.retain(|r| r.id != id);
        self.resolved.push(entry);
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.resolved.clear();
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::from_counts(self.resolved.len(), self.pending.len())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub name: &'static str,
    pub resolved: usize,
    pub pending: usize,
}

/// Data behind the statistics tab.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub resolved: usize,
    pub pending: usize,
    pub trend: [TrendPoint; 2],
}

impl Statistics {
    pub fn from_counts(resolved: usize, pending: usize) -> Self {
        Self {
            resolved,
            pending,
            trend: [
                TrendPoint {
                    name: "Week 1",
                    resolved: resolved.saturating_sub(1).max(1),
                    pending: pending.saturating_sub(2),
                },
                TrendPoint {
                    name: "Week 2",
                    resolved,
                    pending,
                },
            ],
        }
    }
}
