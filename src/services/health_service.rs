use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether the control surface is still publishing snapshots.
pub fn health_status(state: &SharedState) -> HealthResponse {
    if state.is_degraded() {
        warn!("control surface closed (degraded mode)");
        HealthResponse::degraded()
    } else {
        HealthResponse::ok()
    }
}
