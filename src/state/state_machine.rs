//! Pure transition engine: every rule of the game lives in [`transition`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::game::{
    Flash, GameState, LogEvent, MAX_PLAYERS, Mode, Outcome, Player, PlayerId, PlayerStatus,
    QaEntry, RECENT_EVENTS_CAPACITY,
};

/// Log text recorded when navigation is attempted before the answer is revealed.
pub const REVEAL_REQUIRED_NEXT: &str = "reveal required to advance to the next question";
/// Log text recorded when going back is attempted before the answer is revealed.
pub const REVEAL_REQUIRED_PREV: &str = "reveal required to go back to the previous question";
/// Log text recorded when a decided player is scored.
pub const PLAYER_ALREADY_DECIDED: &str = "player already decided";
/// Log text recorded when a manual command targets a player that is not seated.
pub const UNKNOWN_PLAYER: &str = "unknown player";

/// Status requested by a manual override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatusChange {
    /// Put the player back into play.
    Active,
    /// Declare the player a winner with the next free rank.
    Won,
    /// Eliminate the player.
    Lost,
}

/// Commands that can be applied to the game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Switch scoring semantics.
    SetMode {
        /// New mode.
        mode: Mode,
    },
    /// Update count-threshold targets; omitted values are kept.
    SetThresholds {
        /// Correct answers needed to win.
        correct_target: Option<f64>,
        /// Wrong answers that eliminate.
        wrong_target: Option<f64>,
    },
    /// Update simple mode deltas; omitted values are kept.
    SetDeltas {
        /// Points for a correct answer.
        correct: Option<f64>,
        /// Points for a wrong answer.
        wrong: Option<f64>,
    },
    /// Replace the roster.
    SetPlayers {
        /// Raw names as typed by the operator.
        names: Vec<String>,
    },
    /// Arm (or disarm) the scoring target.
    SelectPlayer {
        /// Player to arm, `None` to clear.
        player_id: Option<Uuid>,
    },
    /// Replace the quiz.
    LoadQuiz {
        /// Parsed questions.
        entries: Vec<QaEntry>,
    },
    /// Advance to the next question once revealed.
    NextQuestion,
    /// Go back to the previous question once revealed.
    PrevQuestion,
    /// Show or hide the current question and answer.
    ToggleReveal,
    /// Score the selected player.
    ApplyResult {
        /// Correct or wrong.
        outcome: Outcome,
    },
    /// Manually overwrite a simple mode score.
    SetScore {
        /// Target player.
        player_id: Uuid,
        /// New score.
        value: f64,
    },
    /// Manually overwrite count-threshold tallies; omitted values are kept.
    SetCounts {
        /// Target player.
        player_id: Uuid,
        /// New correct count.
        correct: Option<f64>,
        /// New wrong count.
        wrong: Option<f64>,
    },
    /// Manually override a player's status.
    SetStatus {
        /// Target player.
        player_id: Uuid,
        /// Requested status.
        status: StatusChange,
    },
    /// Append free text to the log.
    AddLog {
        /// Text to record.
        text: String,
    },
    /// Set or clear the flash marker.
    SetFlash {
        /// New marker, `None` to clear.
        flash: Option<Flash>,
    },
}

/// Outcome of applying a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State after the command.
    pub state: GameState,
    /// True when the command raised a fresh flash that needs a clear timer.
    pub flash_armed: bool,
}

impl Transition {
    fn settled(state: GameState) -> Self {
        Self {
            state,
            flash_armed: false,
        }
    }

    fn flashing(state: GameState) -> Self {
        Self {
            state,
            flash_armed: true,
        }
    }
}

/// Apply a command and return the next state.
pub fn apply(state: &GameState, command: Command) -> GameState {
    transition(state, command).state
}

/// Apply a command, reporting whether it armed the flash marker.
///
/// Total over every command: failed preconditions yield the unchanged state,
/// optionally with a log entry explaining the rejection.
pub fn transition(state: &GameState, command: Command) -> Transition {
    let mut next = state.clone();

    match command {
        Command::SetMode { mode } => {
            next.mode = mode;
            push_log(&mut next, format!("mode: {}", mode.as_str()));
        }
        Command::SetThresholds {
            correct_target,
            wrong_target,
        } => {
            if let Some(value) = correct_target {
                next.thresholds.correct_target = coerce_threshold(value);
            }
            if let Some(value) = wrong_target {
                next.thresholds.wrong_target = coerce_threshold(value);
            }
        }
        Command::SetDeltas { correct, wrong } => {
            if let Some(value) = correct {
                next.deltas.correct = coerce_int(value);
            }
            if let Some(value) = wrong {
                next.deltas.wrong = coerce_int(value);
            }
        }
        Command::SetPlayers { names } => {
            next.players = roster_from_names(&names);
            next.selected_player_id = next.players.keys().next().copied();
            next.next_win_rank = 1;
        }
        Command::SelectPlayer { player_id } => match player_id {
            Some(id) if next.players.contains_key(&id) => next.selected_player_id = Some(id),
            Some(_) => {}
            None => next.selected_player_id = None,
        },
        Command::LoadQuiz { entries } => {
            next.quiz = entries;
            next.current_question_index = 0;
            next.answer_revealed = false;
        }
        Command::NextQuestion => {
            if next.quiz.is_empty() {
                return Transition::settled(next);
            }
            if !next.answer_revealed {
                push_log(&mut next, REVEAL_REQUIRED_NEXT);
                return Transition::settled(next);
            }
            let last = next.quiz.len() - 1;
            next.current_question_index = (next.current_question_index + 1).min(last);
            next.answer_revealed = false;
        }
        Command::PrevQuestion => {
            if next.quiz.is_empty() {
                return Transition::settled(next);
            }
            if !next.answer_revealed {
                push_log(&mut next, REVEAL_REQUIRED_PREV);
                return Transition::settled(next);
            }
            next.current_question_index = next.current_question_index.saturating_sub(1);
            next.answer_revealed = false;
        }
        Command::ToggleReveal => {
            next.answer_revealed = !next.answer_revealed;
        }
        Command::ApplyResult { outcome } => return apply_result(next, outcome),
        Command::SetScore { player_id, value } => {
            let Some(player) = next.players.get_mut(&player_id) else {
                push_log(&mut next, UNKNOWN_PLAYER);
                return Transition::settled(next);
            };
            player.score = coerce_int(value);
            let text = format!("{} score corrected", player.name);
            push_log(&mut next, text);
        }
        Command::SetCounts {
            player_id,
            correct,
            wrong,
        } => {
            let Some(player) = next.players.get_mut(&player_id) else {
                push_log(&mut next, UNKNOWN_PLAYER);
                return Transition::settled(next);
            };
            if let Some(value) = correct {
                player.correct_count = coerce_count(value);
            }
            if let Some(value) = wrong {
                player.wrong_count = coerce_count(value);
            }
            let text = format!("{} counts corrected", player.name);
            push_log(&mut next, text);
        }
        Command::SetStatus { player_id, status } => {
            let rank = next.next_win_rank;
            let Some(player) = next.players.get_mut(&player_id) else {
                push_log(&mut next, UNKNOWN_PLAYER);
                return Transition::settled(next);
            };
            let text = match status {
                StatusChange::Active => {
                    player.status = PlayerStatus::Active;
                    format!("{} status: active", player.name)
                }
                StatusChange::Won => {
                    player.status = PlayerStatus::Won { rank };
                    format!("{} manually won {}", player.name, format_rank(rank))
                }
                StatusChange::Lost => {
                    player.status = PlayerStatus::Lost;
                    format!("{} manually lost", player.name)
                }
            };
            if status == StatusChange::Won {
                next.next_win_rank = rank.saturating_add(1);
            }
            push_log(&mut next, text);
        }
        Command::AddLog { text } => push_log(&mut next, text),
        Command::SetFlash { flash } => {
            let armed = flash.is_some();
            next.active_flash = flash;
            return Transition {
                state: next,
                flash_armed: armed,
            };
        }
    }

    Transition::settled(next)
}

fn apply_result(mut next: GameState, outcome: Outcome) -> Transition {
    let Some((player_id, target)) = next.selected_player() else {
        return Transition::settled(next);
    };
    if target.status.is_decided() {
        push_log(&mut next, PLAYER_ALREADY_DECIDED);
        return Transition::settled(next);
    }

    let flash = Flash {
        player_id,
        kind: outcome,
    };

    match next.mode {
        Mode::Simple => {
            let delta = match outcome {
                Outcome::Correct => next.deltas.correct,
                Outcome::Wrong => next.deltas.wrong,
            };
            let Some(player) = next.players.get_mut(&player_id) else {
                return Transition::settled(next);
            };
            player.score = player.score.saturating_add(delta);
            let text = format!("{} {} {delta:+}", player.name, outcome.as_str());
            push_log(&mut next, text);
        }
        Mode::CountThreshold => {
            let correct_target = next.thresholds.correct_target.max(1);
            let wrong_target = next.thresholds.wrong_target.max(1);
            let rank = next.next_win_rank;
            let Some(player) = next.players.get_mut(&player_id) else {
                return Transition::settled(next);
            };
            let previous = player.status;

            match outcome {
                Outcome::Correct => player.correct_count = player.correct_count.saturating_add(1),
                Outcome::Wrong => player.wrong_count = player.wrong_count.saturating_add(1),
            }

            // Win is checked before lose when both targets are reached at once.
            if player.correct_count >= correct_target {
                player.status = PlayerStatus::Won { rank };
            } else if player.wrong_count >= wrong_target {
                player.status = PlayerStatus::Lost;
            }

            let tally = match outcome {
                Outcome::Correct => format!(
                    "{} ○ ({}/{correct_target})",
                    player.name, player.correct_count
                ),
                Outcome::Wrong => {
                    format!("{} × ({}/{wrong_target})", player.name, player.wrong_count)
                }
            };
            let fresh = previous != player.status;
            let announcement = match player.status {
                PlayerStatus::Won { rank } if fresh => {
                    Some((format!("{} won {}", player.name, format_rank(rank)), true))
                }
                PlayerStatus::Lost if fresh => Some((format!("{} lost", player.name), false)),
                _ => None,
            };

            push_log(&mut next, tally);
            if let Some((text, won)) = announcement {
                if won {
                    next.next_win_rank = rank.saturating_add(1);
                }
                push_log(&mut next, text);
            }
        }
    }

    next.active_flash = Some(flash);
    Transition::flashing(next)
}

/// Build a fresh roster: names are trimmed, blanks dropped, and the list capped.
pub fn roster_from_names(names: &[String]) -> IndexMap<PlayerId, Player> {
    names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .take(MAX_PLAYERS)
        .map(|name| (Uuid::new_v4(), Player::new(name.to_string())))
        .collect()
}

/// Prepend an entry to the log, keeping only the most recent ones.
fn push_log(state: &mut GameState, text: impl Into<String>) {
    state.recent_events.push_front(LogEvent::now(text));
    state.recent_events.truncate(RECENT_EVENTS_CAPACITY);
}

/// Format a rank with its English ordinal suffix (1st, 2nd, 11th, 22nd...).
pub fn format_rank(rank: u32) -> String {
    let n = rank.max(1);
    let suffix = match (n % 100, n % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Truncate toward zero; non-finite input becomes zero.
pub fn coerce_int(value: f64) -> i64 {
    if value.is_finite() {
        value.trunc() as i64
    } else {
        0
    }
}

/// Coerce to a non-negative tally.
pub fn coerce_count(value: f64) -> u32 {
    coerce_int(value).clamp(0, i64::from(u32::MAX)) as u32
}

/// Coerce to a threshold of at least one.
pub fn coerce_threshold(value: f64) -> u32 {
    coerce_count(value).max(1)
}
