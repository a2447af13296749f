use axum::{extract::State, response::Response};
use reqwest::Method;

use crate::{
    app_state::AppState,
    upstream::{relay, OnUpstreamError, Relay},
};

pub(crate) async fn learned(State(state): State<AppState>) -> Response {
    relay(
        &state,
        Relay {
            route: "learned",
            method: Method::GET,
            url: state.upstream(&["learned"]),
            body: None,
            on_error: OnUpstreamError::RelayStatus,
            message: "Failed to fetch learned",
        },
    )
    .await
}
