//! Entity routes built from the registry: one controller per entity, six routes under `/{entity}`.

use crate::handlers::entity::{create, delete as delete_handler, list, read, search, update};
use crate::service::ResourceController;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn entity_routes(state: AppState) -> Router {
    state.registry.iter().fold(Router::new(), |router, entity| {
        let controller = ResourceController::new(entity.clone(), state.store.clone());
        router.merge(resource_routes(controller))
    })
}

/// Routes for one entity. `/{entity}/search/:query` has two segments, so it never collides with `/{entity}/:id`.
pub fn resource_routes(controller: ResourceController) -> Router {
    let base = format!("/{}", controller.entity().name);
    Router::new()
        .route(&base, get(list).post(create))
        .route(&format!("{}/search/:query", base), get(search))
        .route(
            &format!("{}/:id", base),
            get(read).put(update).delete(delete_handler),
        )
        .with_state(controller)
}
