//! Side-effect capabilities injected into the dashboard.
//!
//! Workflows never reach for a global notification or audio channel; they
//! call through these traits so the lifecycle logic runs without a terminal
//! or an audio device.

use tracing::info;

/// Transient, auto-dismissing operator notification.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Spoken / audible feedback. Presentation only; failures are swallowed by
/// implementations.
pub trait Announcer: Send + Sync {
    fn announce(&self, text: &str);

    /// Play an audio resource produced by the backend (absolute URL).
    fn play(&self, audio_url: &str) {
        let _ = audio_url;
    }
}

/// Routes notifications into the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        info!(target: "frontdesk::notify", "{message}");
    }
}

/// Discards announcements.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentAnnouncer;

impl Announcer for SilentAnnouncer {
    fn announce(&self, _text: &str) {}
}
