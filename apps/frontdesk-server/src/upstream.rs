//! Relaying browser calls to the backend.
//!
//! Every proxy route funnels through [`relay`]. Successful upstream replies
//! are passed back with their status and JSON body intact (an empty body
//! stays empty); failures collapse
//! into `{"error": "<route message>"}` so backend internals never reach the
//! browser.

use std::time::Instant;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use frontdesk_otel::ACCESS_TARGET;
use reqwest::Method;
use serde_json::Value;
use tracing::{info, warn};
use url::Url;

use crate::{app_state::AppState, responses};

/// What a route does when the backend answers with a non-success status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OnUpstreamError {
    /// Answer 500 regardless of the upstream status.
    Mask,
    /// Keep the upstream status code, swap in the generic body.
    RelayStatus,
}

/// One outbound call as seen from a route handler.
pub(crate) struct Relay<'a> {
    pub route: &'static str,
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
    pub on_error: OnUpstreamError,
    pub message: &'a str,
}

enum Failure {
    Transport(String),
    Status(StatusCode),
    Decode(String),
}

pub(crate) async fn relay(state: &AppState, call: Relay<'_>) -> Response {
    let started = Instant::now();
    let result = forward(state, &call).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let response = match result {
        Ok((status, Some(body))) => (status, Json(body)).into_response(),
        Ok((status, None)) => status.into_response(),
        Err(failure) => {
            let status = match &failure {
                Failure::Status(upstream) => {
                    warn!(route = call.route, upstream = upstream.as_u16(), "backend rejected call");
                    match call.on_error {
                        OnUpstreamError::Mask => StatusCode::INTERNAL_SERVER_ERROR,
                        OnUpstreamError::RelayStatus => *upstream,
                    }
                }
                Failure::Transport(err) => {
                    warn!(route = call.route, error = %err, "backend unreachable");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                Failure::Decode(err) => {
                    warn!(route = call.route, error = %err, "backend reply was not json");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            responses::error_json(status, call.message)
        }
    };

    info!(
        target: ACCESS_TARGET,
        route = call.route,
        method = %call.method,
        upstream = %call.url,
        status = response.status().as_u16(),
        elapsed_ms,
        "relay"
    );
    response
}

async fn forward(
    state: &AppState,
    call: &Relay<'_>,
) -> Result<(StatusCode, Option<Value>), Failure> {
    let mut request = state.client().request(call.method.clone(), call.url.clone());
    if let Some(body) = &call.body {
        request = request.json(body);
    }
    let resp = request
        .send()
        .await
        .map_err(|err| Failure::Transport(err.to_string()))?;
    let status = StatusCode::from_u16(resp.status().as_u16())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if !status.is_success() {
        return Err(Failure::Status(status));
    }
    let bytes = resp
        .bytes()
        .await
        .map_err(|err| Failure::Transport(err.to_string()))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok((status, None));
    }
    let body = serde_json::from_slice(&bytes).map_err(|err| Failure::Decode(err.to_string()))?;
    Ok((status, Some(body)))
}
