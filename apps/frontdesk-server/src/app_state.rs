use anyhow::Context;
use url::Url;

use crate::config::ProxyConfig;

#[derive(Clone)]
pub(crate) struct AppState {
    client: reqwest::Client,
    backend: Url,
}

impl AppState {
    pub fn new(config: &ProxyConfig) -> anyhow::Result<Self> {
        let client = config
            .http
            .client_builder(concat!("frontdesk-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building upstream http client")?;
        let backend = Url::parse(&config.backend_url)
            .with_context(|| format!("invalid backend url {}", config.backend_url))?;
        if backend.cannot_be_a_base() {
            anyhow::bail!("backend url {} cannot carry a path", config.backend_url);
        }
        Ok(Self { client, backend })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Upstream URL for the given path segments, each percent-encoded.
    pub fn upstream(&self, segments: &[&str]) -> Url {
        let mut url = self.backend.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
