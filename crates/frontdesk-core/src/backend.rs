use frontdesk_protocol::{
    CallRequest, CallResponse, LearnedMapping, PendingRequest, ResolveResponse,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never reached the backend or the response never arrived.
    #[error("transport error: {0}")]
    Transport(String),
    /// The backend answered with a non-success status.
    #[error("backend returned {status}")]
    Status { status: u16, body: String },
    /// A success response whose body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl BackendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The operations the dashboard needs from the backend service.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// `GET /requests`
    async fn pending_requests(&self) -> Result<Vec<PendingRequest>, BackendError>;
    /// `GET /learned`
    async fn learned(&self) -> Result<LearnedMapping, BackendError>;
    /// `POST /requests/{id}/resolve`
    async fn resolve(&self, id: &str, answer: &str) -> Result<ResolveResponse, BackendError>;
    /// `POST /call`
    async fn call(&self, request: &CallRequest) -> Result<CallResponse, BackendError>;
    /// `POST /clear`. Only the status matters; the body may be empty.
    async fn clear(&self) -> Result<(), BackendError>;
    /// Absolute URL for a backend-relative resource such as `/audio/x.mp3`.
    fn resource_url(&self, path: &str) -> String;
}
