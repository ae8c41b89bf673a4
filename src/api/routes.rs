use axum::{
    body::Body,
    extract::Request,
    middleware,
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use super::{auth, handlers, AppState};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    // Only the recommendation route is keyed; health and the exploration
    // page stay open.
    let keyed = Router::new()
        .route(
            "/recommendations",
            get(handlers::get_recommendations).post(handlers::post_recommendations),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_function_key,
        ));

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .merge(keyed)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Tracing span for one request. The query string can carry the function
/// key, so only the path is recorded.
fn make_request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = Uuid::new_v4();
    tracing::info_span!(
        "request",
        %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    )
}
