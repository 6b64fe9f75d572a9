use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::format_clock,
    state::game::{GameState, LogEvent},
};

/// Roster submitted from the player setup form.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PlayersRequest {
    /// Raw names; blanks are dropped and at most eight are kept.
    #[validate(length(max = 64))]
    pub names: Vec<String>,
}

/// Quiz document uploaded by the operator.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct QuizImportRequest {
    /// CSV text with a `question_id,question,answer` header row.
    #[validate(length(min = 1, message = "quiz CSV is empty"))]
    pub csv: String,
}

/// Outcome of a successful quiz upload.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuizImportResponse {
    /// Number of questions loaded.
    pub questions: usize,
    /// State after loading.
    pub state: GameState,
}

/// One key press forwarded from the control page.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct KeyPressRequest {
    /// Key name as reported by the browser (`n`, `Enter`, `3`...).
    #[validate(length(min = 1, max = 32))]
    pub key: String,
    /// Whether an input, textarea or content-editable element had focus.
    #[serde(default)]
    pub editable_target: bool,
}

/// Result of a key press.
#[derive(Debug, Serialize, ToSchema)]
pub struct KeyPressResponse {
    /// True when the key is a shortcut and its default action must be suppressed.
    pub handled: bool,
    /// State after the key was processed.
    pub state: GameState,
}

/// Recent event as shown in the control log panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LogLine {
    /// Event id.
    pub id: Uuid,
    /// `HH:MM:SS`, UTC.
    pub time: String,
    /// Event text.
    pub text: String,
}

impl From<&LogEvent> for LogLine {
    fn from(event: &LogEvent) -> Self {
        Self {
            id: event.id,
            time: format_clock(event.at_ms),
            text: event.text.clone(),
        }
    }
}
