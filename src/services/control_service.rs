//! Business logic behind the control routes. Every mutation goes through the control
//! surface so each one publishes exactly one snapshot.

use tracing::{debug, info, warn};

use crate::{
    dto::control::{KeyPressResponse, LogLine, QuizImportResponse},
    error::ServiceError,
    services::{keyboard, quiz_import},
    state::{SharedState, game::GameState, state_machine::Command},
};

/// Log entry added when the setup form is submitted without a usable name.
pub const NO_PLAYER_NAMES: &str = "enter at least one player name";

fn ensure_open(state: &SharedState) -> Result<(), ServiceError> {
    if state.control().is_closed() {
        return Err(ServiceError::Unavailable("control surface closed".into()));
    }
    Ok(())
}

/// Current authoritative state.
pub async fn current_state(state: &SharedState) -> GameState {
    state.control().snapshot().await
}

/// Apply one command and return the published state.
pub async fn dispatch(state: &SharedState, command: Command) -> Result<GameState, ServiceError> {
    ensure_open(state)?;
    Ok(state.control().dispatch(command).await)
}

/// Replace the roster from the setup form.
pub async fn configure_players(
    state: &SharedState,
    names: Vec<String>,
) -> Result<GameState, ServiceError> {
    if names.iter().all(|name| name.trim().is_empty()) {
        info!("player setup submitted without names");
        return dispatch(
            state,
            Command::AddLog {
                text: NO_PLAYER_NAMES.into(),
            },
        )
        .await;
    }
    dispatch(state, Command::SetPlayers { names }).await
}

/// Parse an uploaded quiz and load it; a rejected file leaves the state untouched.
pub async fn import_quiz(state: &SharedState, csv: &str) -> Result<QuizImportResponse, ServiceError> {
    ensure_open(state)?;
    let entries = quiz_import::parse_quiz_csv(csv).inspect_err(|err| {
        warn!(error = %err, "quiz upload rejected");
    })?;

    let questions = entries.len();
    dispatch(state, Command::LoadQuiz { entries }).await?;
    let state = dispatch(
        state,
        Command::AddLog {
            text: format!("quiz loaded: {questions} questions"),
        },
    )
    .await?;
    info!(questions, "quiz loaded");

    Ok(QuizImportResponse { questions, state })
}

/// Translate a key press into a command, reporting whether the key was a shortcut.
pub async fn handle_key(
    state: &SharedState,
    key: &str,
    editable_target: bool,
) -> Result<KeyPressResponse, ServiceError> {
    let Some(shortcut) = keyboard::shortcut_for_key(key, editable_target) else {
        return Ok(KeyPressResponse {
            handled: false,
            state: current_state(state).await,
        });
    };

    let current = current_state(state).await;
    let state = match keyboard::command_for(shortcut, &current) {
        Some(command) => dispatch(state, command).await?,
        None => {
            debug!(?shortcut, "shortcut has no target");
            current
        }
    };

    Ok(KeyPressResponse {
        handled: true,
        state,
    })
}

/// Recent events, newest first.
pub async fn recent_log(state: &SharedState) -> Vec<LogLine> {
    current_state(state)
        .await
        .recent_events
        .iter()
        .map(LogLine::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, state::AppState};

    #[tokio::test]
    async fn blank_roster_only_logs() {
        let state = AppState::new(AppConfig::default());
        let next = configure_players(&state, vec!["  ".into(), String::new()])
            .await
            .unwrap();
        assert!(next.players.is_empty());
        assert_eq!(next.recent_events[0].text, NO_PLAYER_NAMES);
    }

    #[tokio::test]
    async fn rejected_quiz_leaves_state_untouched() {
        let state = AppState::new(AppConfig::default());
        let before = current_state(&state).await;

        let err = import_quiz(&state, "question_id,question,answer\n")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::QuizImport(_)));
        assert_eq!(current_state(&state).await, before);
    }

    #[tokio::test]
    async fn quiz_import_loads_and_logs() {
        let state = AppState::new(AppConfig::default());
        let response = import_quiz(&state, "question_id,question,answer\nQ1,Who?,Me\nQ2,Why?,Because\n")
            .await
            .unwrap();
        assert_eq!(response.questions, 2);
        assert_eq!(response.state.quiz.len(), 2);
        assert_eq!(response.state.current_question_index, 0);
        assert_eq!(response.state.recent_events[0].text, "quiz loaded: 2 questions");
    }

    #[tokio::test]
    async fn keys_drive_commands() {
        let state = AppState::new(AppConfig::default());
        configure_players(&state, vec!["Ann".into(), "Bob".into()])
            .await
            .unwrap();

        let selected = handle_key(&state, "2", false).await.unwrap();
        assert!(selected.handled);
        let (bob, _) = selected.state.player_at(1).unwrap();
        assert_eq!(selected.state.selected_player_id, Some(bob));

        let empty_seat = handle_key(&state, "7", false).await.unwrap();
        assert!(empty_seat.handled);
        assert_eq!(empty_seat.state.selected_player_id, Some(bob));

        let typing = handle_key(&state, "Enter", true).await.unwrap();
        assert!(!typing.handled);
        assert_eq!(typing.state.players[&bob].score, 0);

        let scored = handle_key(&state, "Enter", false).await.unwrap();
        assert_eq!(scored.state.players[&bob].score, 1);
    }

    #[tokio::test]
    async fn closed_control_refuses_commands() {
        let state = AppState::new(AppConfig::default());
        state.shutdown();
        let err = dispatch(&state, Command::ToggleReveal).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable(_)));
    }
}
