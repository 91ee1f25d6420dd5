mod common;
mod entity;

pub use common::common_routes;
pub use entity::{entity_routes, resource_routes};

use crate::state::AppState;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Everything under `/api`: the common routes plus every registered entity.
pub fn api_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(common_routes(state.clone()))
        .merge(entity_routes(state));
    Router::new().nest("/api", api)
}

/// `api_router` wrapped in trace spans, the request body limit and permissive CORS.
/// CORS sits innermost: it needs a response body that implements `Default`.
pub fn app_router(state: AppState, body_limit: usize) -> Router {
    api_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(RequestBodyLimitLayer::new(body_limit))
            .layer(CorsLayer::permissive()),
    )
}
