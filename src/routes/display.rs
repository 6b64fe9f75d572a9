use axum::{Json, Router, extract::State, routing::get};

use crate::{dto::display::DisplayView, services::display_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/display/view",
    tag = "display",
    responses((status = 200, description = "Presentation of the last received snapshot", body = DisplayView))
)]
/// Render-ready view of the in-process display surface.
pub async fn get_view(State(state): State<SharedState>) -> Json<DisplayView> {
    Json(display_service::current_view(&state))
}

/// Configure the display routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/display/view", get(get_view))
}
