use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::control::{
        KeyPressRequest, KeyPressResponse, LogLine, PlayersRequest, QuizImportRequest,
        QuizImportResponse,
    },
    error::AppError,
    services::control_service,
    state::{SharedState, game::GameState, state_machine::Command},
};

/// Operator endpoints driving the authoritative game state.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/control/state", get(get_state))
        .route("/control/commands", post(post_command))
        .route("/control/players", post(post_players))
        .route("/control/quiz", post(post_quiz))
        .route("/control/keys", post(post_key))
        .route("/control/log", get(get_log))
}

/// Return the authoritative game state.
#[utoipa::path(
    get,
    path = "/control/state",
    tag = "control",
    responses((status = 200, description = "Current game state", body = GameState))
)]
pub async fn get_state(State(state): State<SharedState>) -> Json<GameState> {
    Json(control_service::current_state(&state).await)
}

/// Apply a single command and return the resulting state.
#[utoipa::path(
    post,
    path = "/control/commands",
    tag = "control",
    request_body = Command,
    responses(
        (status = 200, description = "Command applied and published", body = GameState),
        (status = 503, description = "Control surface closed")
    )
)]
pub async fn post_command(
    State(state): State<SharedState>,
    Json(command): Json<Command>,
) -> Result<Json<GameState>, AppError> {
    Ok(Json(control_service::dispatch(&state, command).await?))
}

/// Replace the roster from the player setup form.
#[utoipa::path(
    post,
    path = "/control/players",
    tag = "control",
    request_body = PlayersRequest,
    responses(
        (status = 200, description = "Roster replaced, or a hint logged when no name was given", body = GameState),
        (status = 400, description = "Invalid payload")
    )
)]
pub async fn post_players(
    State(state): State<SharedState>,
    Json(payload): Json<PlayersRequest>,
) -> Result<Json<GameState>, AppError> {
    payload.validate()?;
    Ok(Json(
        control_service::configure_players(&state, payload.names).await?,
    ))
}

/// Load a quiz from CSV text.
#[utoipa::path(
    post,
    path = "/control/quiz",
    tag = "control",
    request_body = QuizImportRequest,
    responses(
        (status = 200, description = "Quiz loaded", body = QuizImportResponse),
        (status = 400, description = "CSV rejected; state unchanged")
    )
)]
pub async fn post_quiz(
    State(state): State<SharedState>,
    Json(payload): Json<QuizImportRequest>,
) -> Result<Json<QuizImportResponse>, AppError> {
    payload.validate()?;
    Ok(Json(control_service::import_quiz(&state, &payload.csv).await?))
}

/// Forward a key press to the shortcut mapping.
#[utoipa::path(
    post,
    path = "/control/keys",
    tag = "control",
    request_body = KeyPressRequest,
    responses(
        (status = 200, description = "Key processed; `handled` tells whether to suppress its default", body = KeyPressResponse),
        (status = 400, description = "Invalid payload")
    )
)]
pub async fn post_key(
    State(state): State<SharedState>,
    Json(payload): Json<KeyPressRequest>,
) -> Result<Json<KeyPressResponse>, AppError> {
    payload.validate()?;
    Ok(Json(
        control_service::handle_key(&state, &payload.key, payload.editable_target).await?,
    ))
}

/// Recent events, newest first.
#[utoipa::path(
    get,
    path = "/control/log",
    tag = "control",
    responses((status = 200, description = "Recent events", body = [LogLine]))
)]
pub async fn get_log(State(state): State<SharedState>) -> Json<Vec<LogLine>> {
    Json(control_service::recent_log(&state).await)
}
