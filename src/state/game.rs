use std::collections::VecDeque;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum number of players a game can seat.
pub const MAX_PLAYERS: usize = 8;
/// Number of entries kept in [`GameState::recent_events`].
pub const RECENT_EVENTS_CAPACITY: usize = 8;

/// Stable identifier of a player, generated once when the roster is configured.
pub type PlayerId = Uuid;

/// Scoring semantics applied by `ApplyResult`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Points accumulate using the configured deltas.
    #[default]
    Simple,
    /// Players win after N correct answers and lose after M wrong ones.
    CountThreshold,
}

impl Mode {
    /// Wire name of the mode, also used in log entries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Simple => "simple",
            Mode::CountThreshold => "count_threshold",
        }
    }
}

/// Win/lose targets used in count-threshold mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Thresholds {
    /// Correct answers needed to win (N).
    pub correct_target: u32,
    /// Wrong answers that eliminate a player (M).
    pub wrong_target: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            correct_target: 3,
            wrong_target: 2,
        }
    }
}

/// Score adjustments used in simple mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Deltas {
    /// Added to the score on a correct answer.
    pub correct: i64,
    /// Added to the score on a wrong answer (usually negative).
    pub wrong: i64,
}

impl Default for Deltas {
    fn default() -> Self {
        Self {
            correct: 1,
            wrong: -1,
        }
    }
}

/// Result of a single answer, shared by scoring commands and the flash marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The answer was right.
    Correct,
    /// The answer was wrong.
    Wrong,
}

impl Outcome {
    /// Lowercase label used in log entries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Correct => "correct",
            Outcome::Wrong => "wrong",
        }
    }
}

/// Lifecycle of a player with respect to automatic scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerStatus {
    /// Still eligible for scoring commands.
    #[default]
    Active,
    /// Won the game; `rank` is the win order.
    Won {
        /// Position in the win order, starting at 1.
        rank: u32,
    },
    /// Eliminated.
    Lost,
}

impl PlayerStatus {
    /// A decided player is immune to automatic scoring.
    pub fn is_decided(&self) -> bool {
        match self {
            PlayerStatus::Active => false,
            PlayerStatus::Won { .. } | PlayerStatus::Lost => true,
        }
    }
}

/// Player info tracked during a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Player {
    /// Display name, trimmed and never empty.
    pub name: String,
    /// Simple mode accumulator.
    pub score: i64,
    /// Count-threshold mode correct answers.
    pub correct_count: u32,
    /// Count-threshold mode wrong answers.
    pub wrong_count: u32,
    /// Current status.
    pub status: PlayerStatus,
}

impl Player {
    /// Build a fresh, active player with zeroed accumulators.
    pub fn new(name: String) -> Self {
        Self {
            name,
            score: 0,
            correct_count: 0,
            wrong_count: 0,
            status: PlayerStatus::Active,
        }
    }
}

/// One question of the loaded quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QaEntry {
    /// Identifier taken from the `question_id` column.
    pub question_id: String,
    /// Question text.
    pub question: String,
    /// Answer text.
    pub answer: String,
}

/// Observational log line kept in [`GameState::recent_events`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LogEvent {
    /// Generated identifier.
    pub id: Uuid,
    /// Creation time in unix milliseconds.
    pub at_ms: i64,
    /// Human readable text.
    pub text: String,
}

impl LogEvent {
    /// Stamp a new entry with a fresh id and the current time.
    pub fn now(text: impl Into<String>) -> Self {
        let at_ms = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        Self {
            id: Uuid::new_v4(),
            at_ms: at_ms as i64,
            text: text.into(),
        }
    }
}

/// Transient marker describing the latest scoring action, used for a visual pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Flash {
    /// Player that was scored.
    pub player_id: Uuid,
    /// Whether the answer was correct or wrong.
    pub kind: Outcome,
}

/// Authoritative game aggregate owned by the control surface and mirrored by displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GameState {
    /// Scoring semantics.
    pub mode: Mode,
    /// Count-threshold mode targets.
    pub thresholds: Thresholds,
    /// Simple mode deltas.
    pub deltas: Deltas,
    /// Roster keyed by id, in display order.
    #[schema(value_type = Object)]
    pub players: IndexMap<PlayerId, Player>,
    /// Armed target of scoring commands; always resolves into `players` when set.
    pub selected_player_id: Option<Uuid>,
    /// Loaded questions.
    pub quiz: Vec<QaEntry>,
    /// Index of the current question (meaningless while the quiz is empty).
    pub current_question_index: usize,
    /// Reveal gate; question navigation is blocked while false.
    pub answer_revealed: bool,
    /// Rank handed to the next winner; never reused.
    pub next_win_rank: u32,
    /// Most-recent-first log, capped to [`RECENT_EVENTS_CAPACITY`].
    #[schema(value_type = Vec<LogEvent>)]
    pub recent_events: VecDeque<LogEvent>,
    /// Flash marker cleared by the control surface timer.
    pub active_flash: Option<Flash>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::with_rules(Mode::default(), Thresholds::default(), Deltas::default())
    }
}

impl GameState {
    /// Build an empty game using the given rules.
    pub fn with_rules(mode: Mode, thresholds: Thresholds, deltas: Deltas) -> Self {
        Self {
            mode,
            thresholds,
            deltas,
            players: IndexMap::new(),
            selected_player_id: None,
            quiz: Vec::new(),
            current_question_index: 0,
            answer_revealed: false,
            next_win_rank: 1,
            recent_events: VecDeque::with_capacity(RECENT_EVENTS_CAPACITY),
            active_flash: None,
        }
    }

    /// Question currently on screen, if a quiz is loaded.
    pub fn current_question(&self) -> Option<&QaEntry> {
        self.quiz.get(self.current_question_index)
    }

    /// Player currently armed for scoring commands.
    pub fn selected_player(&self) -> Option<(PlayerId, &Player)> {
        let id = self.selected_player_id?;
        self.players.get(&id).map(|player| (id, player))
    }

    /// Player at a zero-based roster position.
    pub fn player_at(&self, index: usize) -> Option<(PlayerId, &Player)> {
        self.players.get_index(index).map(|(id, player)| (*id, player))
    }
}
