use frontdesk_protocol::{
    CallRequest, CallResponse, LearnedMapping, PendingRequest, ResolveRequest, ResolveResponse,
};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use url::Url;

use crate::backend::{Backend, BackendError};
use crate::config::{normalize_base, HttpSettings};

/// [`Backend`] over HTTP/JSON.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(base: &str) -> Result<Self, BackendError> {
        Self::with_settings(base, &HttpSettings::from_env())
    }

    pub fn with_settings(base: &str, settings: &HttpSettings) -> Result<Self, BackendError> {
        let client = settings
            .client_builder(&user_agent())
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Self::with_client(client, base)
    }

    pub fn with_client(client: reqwest::Client, base: &str) -> Result<Self, BackendError> {
        let base = Url::parse(&normalize_base(base))
            .map_err(|e| BackendError::Transport(format!("invalid backend url {base}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(BackendError::Transport(format!(
                "backend url {base} cannot be a base"
            )));
        }
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        self.exchange(req)
            .await?
            .json::<T>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// Send and check the status only; the body is read and discarded.
    async fn send_status(&self, req: reqwest::RequestBuilder) -> Result<(), BackendError> {
        let resp = self.exchange(req).await?;
        let _ = resp.bytes().await;
        Ok(())
    }

    async fn exchange(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, BackendError> {
        let resp = req
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

fn user_agent() -> String {
    format!("frontdesk-core/{}", env!("CARGO_PKG_VERSION"))
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn pending_requests(&self) -> Result<Vec<PendingRequest>, BackendError> {
        self.send(self.client.get(self.endpoint(&["requests"])))
            .await
    }

    async fn learned(&self) -> Result<LearnedMapping, BackendError> {
        self.send(self.client.get(self.endpoint(&["learned"]))).await
    }

    async fn resolve(&self, id: &str, answer: &str) -> Result<ResolveResponse, BackendError> {
        let body = ResolveRequest {
            answer: answer.to_string(),
        };
        self.send(
            self.client
                .post(self.endpoint(&["requests", id, "resolve"]))
                .json(&body),
        )
        .await
    }

    async fn call(&self, request: &CallRequest) -> Result<CallResponse, BackendError> {
        self.send(self.client.post(self.endpoint(&["call"])).json(request))
            .await
    }

    async fn clear(&self) -> Result<(), BackendError> {
        self.send_status(self.client.post(self.endpoint(&["clear"])))
            .await
    }

    /// `path` is joined as a relative reference, so a query or fragment
    /// survives and absolute URLs pass through.
    fn resource_url(&self, path: &str) -> String {
        let mut base = self.base.clone();
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }
        match base.join(path.trim_start_matches('/')) {
            Ok(url) => url.to_string(),
            Err(_) => path.to_string(),
        }
    }
}
