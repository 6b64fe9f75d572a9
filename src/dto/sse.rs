use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::game::GameState;

/// SSE event name used for snapshot envelopes.
pub const EVENT_STATE: &str = "state";

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    /// SSE event name.
    pub event: Option<String>,
    /// Encoded payload.
    pub data: String,
}

impl ServerEvent {
    /// Wrap an already encoded snapshot envelope as a `state` event.
    pub fn state(data: String) -> Self {
        Self {
            event: Some(EVENT_STATE.to_string()),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
/// Wire envelope published on the snapshot channel.
#[serde(tag = "type")]
pub enum StateEnvelope {
    /// Whole-state snapshot.
    #[serde(rename = "STATE")]
    State {
        /// The complete game state.
        state: GameState,
    },
}

impl StateEnvelope {
    /// Encode the envelope as JSON text.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode a received message; anything that is not a well-formed envelope is rejected.
    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Consume the envelope and return the carried snapshot.
    pub fn into_state(self) -> GameState {
        match self {
            StateEnvelope::State { state } => state,
        }
    }
}
