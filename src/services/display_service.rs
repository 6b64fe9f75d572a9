use crate::{dto::display::DisplayView, state::SharedState};

/// Presentation of the last snapshot received by the in-process display.
pub fn current_view(state: &SharedState) -> DisplayView {
    state.display().view()
}
