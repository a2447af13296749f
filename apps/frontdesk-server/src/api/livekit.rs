use axum::{
    extract::{Path, State},
    response::Response,
};
use reqwest::Method;

use crate::{
    app_state::AppState,
    upstream::{relay, OnUpstreamError, Relay},
};

/// `GET /livekit/token/{identity}/{room}`: any backend failure reads as 500.
pub(crate) async fn token(
    State(state): State<AppState>,
    Path((identity, room)): Path<(String, String)>,
) -> Response {
    relay(
        &state,
        Relay {
            route: "livekit.token",
            method: Method::GET,
            url: state.upstream(&["livekit", "token", identity.as_str(), room.as_str()]),
            body: None,
            on_error: OnUpstreamError::Mask,
            message: "Failed to get token",
        },
    )
    .await
}
