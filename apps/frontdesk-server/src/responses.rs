use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use frontdesk_protocol::ErrorBody;

pub(crate) fn error_json(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}

pub(crate) fn bad_body(message: &str) -> Response {
    error_json(StatusCode::INTERNAL_SERVER_ERROR, message)
}
