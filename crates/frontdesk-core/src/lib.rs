//! Request-lifecycle contract behind the supervisor dashboard.
//!
//! The backend owns every piece of persistent state. This crate holds the
//! dashboard's cached view of it (pending requests, resolved answers, the
//! active tab) and the workflows that keep that cache in step with the
//! backend: the poll cycle, resolving a request, simulating a call, and
//! clearing all data.

pub mod backend;
pub mod capability;
pub mod config;
pub mod dashboard;
pub mod http;
pub mod inflight;
pub mod poll;
pub mod state;
mod tab;

#[cfg(any(test, feature = "test_support"))]
pub mod test_support;

pub use backend::{Backend, BackendError};
pub use capability::{Announcer, Notifier, SilentAnnouncer, TracingNotifier};
pub use dashboard::{Dashboard, Draft, Outcome};
pub use http::HttpBackend;
pub use poll::{fetch_snapshot, PollHandle};
pub use state::{DashboardState, Snapshot, Statistics, TrendPoint};
pub use tab::Tab;
