//! Presentation values derived from a received snapshot for the read-only display.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::{
    game::{GameState, Mode, Outcome, Player, PlayerStatus},
    state_machine::format_rank,
};

/// Everything the projected screen renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DisplayView {
    /// Scoring semantics, selecting which band players show.
    pub mode: Mode,
    /// Absent while no quiz is loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionCard>,
    /// One card per player, in roster order.
    pub players: Vec<PlayerCard>,
}

/// Current question header; texts are only exposed once revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct QuestionCard {
    /// Identifier from the quiz file.
    pub question_id: String,
    /// 1-based position in the quiz.
    pub position: usize,
    /// Number of questions in the quiz.
    pub total: usize,
    /// Whether the answer is shown.
    pub revealed: bool,
    /// Question text, once revealed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    /// Answer text, once revealed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

/// One card per seated player, in roster order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PlayerCard {
    /// Player id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Present while this player is the target of the active flash.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Outcome>,
    /// Score, tallies or final standing.
    pub band: ScoreBand,
}

/// Bottom band of a player card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreBand {
    /// Player has won.
    Won {
        /// Finishing position.
        rank: u32,
        /// Ordinal label such as `2nd`.
        label: String,
    },
    /// Player has been eliminated.
    Lost,
    /// Tallies in count-threshold mode.
    Counts {
        /// Correct answers so far.
        correct: u32,
        /// Wrong answers so far.
        wrong: u32,
    },
    /// Score in simple mode.
    Score {
        /// Current score.
        value: i64,
    },
}

impl ScoreBand {
    fn for_player(mode: Mode, player: &Player) -> Self {
        match player.status {
            PlayerStatus::Won { rank } => ScoreBand::Won {
                rank,
                label: format_rank(rank),
            },
            PlayerStatus::Lost => ScoreBand::Lost,
            PlayerStatus::Active => match mode {
                Mode::CountThreshold => ScoreBand::Counts {
                    correct: player.correct_count,
                    wrong: player.wrong_count,
                },
                Mode::Simple => ScoreBand::Score {
                    value: player.score,
                },
            },
        }
    }
}

impl From<&GameState> for DisplayView {
    fn from(state: &GameState) -> Self {
        let question = state.current_question().map(|entry| QuestionCard {
            question_id: entry.question_id.clone(),
            position: state.current_question_index + 1,
            total: state.quiz.len(),
            revealed: state.answer_revealed,
            question: state.answer_revealed.then(|| entry.question.clone()),
            answer: state.answer_revealed.then(|| entry.answer.clone()),
        });

        let players = state
            .players
            .iter()
            .map(|(id, player)| PlayerCard {
                id: *id,
                name: player.name.clone(),
                flash: state
                    .active_flash
                    .filter(|flash| flash.player_id == *id)
                    .map(|flash| flash.kind),
                band: ScoreBand::for_player(state.mode, player),
            })
            .collect();

        Self {
            mode: state.mode,
            question,
            players,
        }
    }
}
