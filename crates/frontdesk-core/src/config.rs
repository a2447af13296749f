use std::time::Duration;

use tracing::warn;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_CALLER_ID: &str = "dashboard_user";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 3;

/// Parse an integer env var; unset or invalid values fall back to `default`.
pub fn env_u64(key: &str, default: u64) -> u64 {
    env_opt_u64(key).unwrap_or(default)
}

pub fn env_opt_u64(key: &str) -> Option<u64> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(v) => Some(v),
        Err(err) => {
            warn!(key, value = %raw, %err, "ignoring invalid integer setting");
            None
        }
    }
}

pub fn env_string(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Backend base address with any trailing `/` removed.
pub fn backend_url_from_env() -> String {
    normalize_base(&env_string("FRONTDESK_BACKEND_URL", DEFAULT_BACKEND_URL))
}

pub fn normalize_base(base: &str) -> String {
    base.trim().trim_end_matches('/').to_string()
}

/// Outbound HTTP knobs shared by the proxy and the dashboard client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    /// `None` means outbound calls may wait indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: None,
        }
    }
}

impl HttpSettings {
    pub fn from_env() -> Self {
        Self {
            connect_timeout: Duration::from_secs(
                env_u64(
                    "FRONTDESK_HTTP_CONNECT_TIMEOUT_SECS",
                    DEFAULT_CONNECT_TIMEOUT_SECS,
                )
                .max(1),
            ),
            request_timeout: env_opt_u64("FRONTDESK_HTTP_TIMEOUT_SECS")
                .filter(|v| *v > 0)
                .map(Duration::from_secs),
        }
    }

    /// Base client builder with these settings applied.
    pub fn client_builder(&self, user_agent: &str) -> reqwest::ClientBuilder {
        let builder = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(self.connect_timeout);
        match self.request_timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_trailing_slashes() {
        assert_eq!(normalize_base(" http://h:1// "), "http://h:1");
        assert_eq!(normalize_base("http://h:1"), "http://h:1");
    }

    #[test]
    fn default_settings_have_no_request_timeout() {
        let settings = HttpSettings::default();
        assert_eq!(settings.request_timeout, None);
        assert_eq!(settings.connect_timeout, Duration::from_secs(3));
    }
}
