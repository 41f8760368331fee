use crate::handlers::vehicle;
use crate::state::AppState;
use axum::{Router, routing::post};
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub fn create_router(state: AppState) -> Router {
    // the wildcard keeps trailing slashes and undecodable ids inside the handlers
    let vehicle_routes = Router::new()
        .route(
            "/{*path}",
            post(vehicle::update_position).get(vehicle::stream_position),
        )
        .method_not_allowed_fallback(vehicle::not_found);

    Router::new()
        .nest("/vehicle", vehicle_routes)
        .fallback(vehicle::not_found)
        .layer(request_log_layer())
        .with_state(state)
}

/// One `info` line per request: method, uri, status and latency.
fn request_log_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Micros),
        )
}
