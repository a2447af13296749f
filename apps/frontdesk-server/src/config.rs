use std::net::SocketAddr;

use frontdesk_core::config::{backend_url_from_env, HttpSettings};
use tracing::warn;

const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Clone, Debug)]
pub(crate) struct ProxyConfig {
    pub bind: SocketAddr,
    pub backend_url: String,
    pub http: HttpSettings,
}

impl ProxyConfig {
    pub fn from_env() -> Self {
        Self {
            bind: bind_from_env(),
            backend_url: backend_url_from_env(),
            http: HttpSettings::from_env(),
        }
    }
}

fn bind_from_env() -> SocketAddr {
    let fallback = || {
        DEFAULT_BIND
            .parse::<SocketAddr>()
            .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 3000)))
    };
    match std::env::var("FRONTDESK_BIND") {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|err| {
            warn!(value = %raw, %err, "invalid FRONTDESK_BIND; using {DEFAULT_BIND}");
            fallback()
        }),
        Err(_) => fallback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::env;
    use std::time::Duration;

    #[test]
    fn defaults_point_at_loopback_backend() {
        let mut guard = env::guard();
        guard.clear_keys(&[
            "FRONTDESK_BIND",
            "FRONTDESK_BACKEND_URL",
            "FRONTDESK_HTTP_TIMEOUT_SECS",
            "FRONTDESK_HTTP_CONNECT_TIMEOUT_SECS",
        ]);
        let cfg = ProxyConfig::from_env();
        assert_eq!(cfg.bind, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.backend_url, "http://127.0.0.1:8000");
        assert_eq!(cfg.http.request_timeout, None);
    }

    #[test]
    fn env_overrides_and_invalid_values_fall_back() {
        let mut guard = env::guard();
        guard.set("FRONTDESK_BIND", "not-an-addr");
        guard.set("FRONTDESK_BACKEND_URL", "http://backend:9000/");
        guard.set("FRONTDESK_HTTP_TIMEOUT_SECS", "12");
        guard.set("FRONTDESK_HTTP_CONNECT_TIMEOUT_SECS", "zero");
        let cfg = ProxyConfig::from_env();
        assert_eq!(cfg.bind.port(), 3000);
        assert_eq!(cfg.backend_url, "http://backend:9000");
        assert_eq!(cfg.http.request_timeout, Some(Duration::from_secs(12)));
        assert_eq!(cfg.http.connect_timeout, Duration::from_secs(3));
    }
}
