use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{error::AppError, services::sse_service, state::SharedState};

/// Path of the display snapshot stream.
pub const DISPLAY_STREAM_PATH: &str = "/sse/display";

#[utoipa::path(
    get,
    path = "/sse/display",
    tag = "sse",
    responses(
        (status = 200, description = "Snapshot stream; every publish arrives as a `state` event", content_type = "text/event-stream", body = String),
        (status = 503, description = "Snapshot channel closed")
    )
)]
/// Stream every published snapshot to a remote display.
pub async fn display_stream(
    State(state): State<SharedState>,
) -> Result<Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>>, AppError> {
    let (channel, receiver) = sse_service::subscribe_display(&state)?;
    info!("New display SSE connection");
    Ok(sse_service::to_sse_stream(channel, receiver))
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route(DISPLAY_STREAM_PATH, get(display_stream))
}
