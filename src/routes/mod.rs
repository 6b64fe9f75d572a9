use axum::Router;

use crate::state::SharedState;

/// Operator command routes.
pub mod control;
/// Display view route.
pub mod display;
/// Swagger UI and OpenAPI document.
pub mod docs;
/// Health check route.
pub mod health;
/// SSE stream route.
pub mod sse;
/// Startup view routing.
pub mod view;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(control::router())
        .merge(display::router())
        .merge(sse::router())
        .merge(view::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
