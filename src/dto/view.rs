use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Surface a browser tab should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Operator page driving the game.
    Control,
    /// Read-only projected scoreboard.
    Display,
}

impl ViewMode {
    /// A location fragment containing `/display` selects the display; anything else the control.
    pub fn from_fragment(fragment: &str) -> Self {
        if fragment.contains("/display") {
            ViewMode::Display
        } else {
            ViewMode::Control
        }
    }

    /// Route serving the state this view renders.
    pub fn state_path(&self) -> &'static str {
        match self {
            ViewMode::Control => "/control/state",
            ViewMode::Display => "/display/view",
        }
    }
}

/// Query of the view routing endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ViewQuery {
    /// Location fragment, e.g. `#/display`.
    #[serde(default)]
    pub fragment: String,
}

/// Startup routing decision for a browser tab.
#[derive(Debug, Serialize, ToSchema)]
pub struct ViewResponse {
    /// Surface to render.
    pub view: ViewMode,
    /// Route returning the initial state for that surface.
    pub state_path: String,
    /// SSE route delivering later snapshots.
    pub stream_path: String,
}

impl ViewResponse {
    /// Routing decision for `fragment`; live updates always come from `stream_path`.
    pub fn for_fragment(fragment: &str, stream_path: &str) -> Self {
        let view = ViewMode::from_fragment(fragment);
        Self {
            view,
            state_path: view.state_path().to_string(),
            stream_path: stream_path.to_string(),
        }
    }
}
