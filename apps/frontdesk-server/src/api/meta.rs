use axum::{response::IntoResponse, Json};
use serde_json::json;

pub(crate) async fn healthz() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}
