use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{api, app_state::AppState};

pub(crate) mod paths {
    pub const HEALTHZ: &str = "/healthz";
    pub const REQUESTS: &str = "/requests";
    pub const REQUEST_RESOLVE: &str = "/requests/{id}/resolve";
    pub const LEARNED: &str = "/learned";
    pub const LIVEKIT_TOKEN: &str = "/livekit/token/{identity}/{room}";
    pub const CALL: &str = "/call";
    pub const CLEAR: &str = "/clear";
}

pub(crate) fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(paths::HEALTHZ, get(api::meta::healthz))
        .route(
            paths::REQUESTS,
            get(api::requests::list).post(api::requests::create),
        )
        .route(paths::REQUEST_RESOLVE, post(api::requests::resolve))
        .route(paths::LEARNED, get(api::learned::learned))
        .route(paths::LIVEKIT_TOKEN, get(api::livekit::token))
        .route(paths::CALL, post(api::call::call))
        .route(paths::CLEAR, post(api::call::clear))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
