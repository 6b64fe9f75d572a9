use axum::{Json, Router, extract::Query, routing::get};

use crate::{
    dto::view::{ViewQuery, ViewResponse},
    routes::sse::DISPLAY_STREAM_PATH,
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/view",
    tag = "view",
    params(ViewQuery),
    responses((status = 200, description = "Which surface the tab renders", body = ViewResponse))
)]
/// Decide once, at page load, whether a tab is the control or the display.
pub async fn route_view(Query(query): Query<ViewQuery>) -> Json<ViewResponse> {
    Json(ViewResponse::for_fragment(&query.fragment, DISPLAY_STREAM_PATH))
}

/// Configure the view routing endpoint.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/view", get(route_view))
}
