use axum::{extract::State, response::Response};
use bytes::Bytes;
use reqwest::Method;

use super::parse_body;
use crate::{
    app_state::AppState,
    responses,
    upstream::{relay, OnUpstreamError, Relay},
};

const CALL_FAILED: &str = "Failed to simulate call";
const CLEAR_FAILED: &str = "Failed to clear data";

/// `POST /call`: simulated AI call, body forwarded as sent.
pub(crate) async fn call(State(state): State<AppState>, body: Bytes) -> Response {
    let Ok(payload) = parse_body(&body) else {
        return responses::bad_body(CALL_FAILED);
    };
    relay(
        &state,
        Relay {
            route: "call",
            method: Method::POST,
            url: state.upstream(&["call"]),
            body: Some(payload),
            on_error: OnUpstreamError::RelayStatus,
            message: CALL_FAILED,
        },
    )
    .await
}

/// `POST /clear`: wipe pending and learned data upstream.
pub(crate) async fn clear(State(state): State<AppState>) -> Response {
    relay(
        &state,
        Relay {
            route: "clear",
            method: Method::POST,
            url: state.upstream(&["clear"]),
            body: None,
            on_error: OnUpstreamError::RelayStatus,
            message: CLEAR_FAILED,
        },
    )
    .await
}
