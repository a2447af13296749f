use axum::{
    extract::{Path, State},
    response::Response,
};
use bytes::Bytes;
use reqwest::Method;
use serde_json::{json, Value};

use super::parse_body;
use crate::{
    app_state::AppState,
    responses,
    upstream::{relay, OnUpstreamError, Relay},
};

const FETCH_FAILED: &str = "Failed to fetch requests";
const POST_FAILED: &str = "Failed to post request";
const RESOLVE_FAILED: &str = "Failed to resolve request";

/// `GET /requests`: pending help requests.
pub(crate) async fn list(State(state): State<AppState>) -> Response {
    relay(
        &state,
        Relay {
            route: "requests.list",
            method: Method::GET,
            url: state.upstream(&["requests"]),
            body: None,
            on_error: OnUpstreamError::Mask,
            message: FETCH_FAILED,
        },
    )
    .await
}

/// `POST /requests`: create a request; the body is forwarded untouched.
pub(crate) async fn create(State(state): State<AppState>, body: Bytes) -> Response {
    let Ok(payload) = parse_body(&body) else {
        return responses::bad_body(POST_FAILED);
    };
    relay(
        &state,
        Relay {
            route: "requests.create",
            method: Method::POST,
            url: state.upstream(&["requests"]),
            body: Some(payload),
            on_error: OnUpstreamError::RelayStatus,
            message: POST_FAILED,
        },
    )
    .await
}

/// `POST /requests/{id}/resolve`: only `answer` is passed on.
pub(crate) async fn resolve(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    let Ok(payload) = parse_body(&body) else {
        return responses::bad_body(RESOLVE_FAILED);
    };
    let answer = payload.get("answer").cloned().unwrap_or(Value::Null);
    relay(
        &state,
        Relay {
            route: "requests.resolve",
            method: Method::POST,
            url: state.upstream(&["requests", id.as_str(), "resolve"]),
            body: Some(json!({ "answer": answer })),
            on_error: OnUpstreamError::RelayStatus,
            message: RESOLVE_FAILED,
        },
    )
    .await
}
