//! Property-based tests for the transition engine.
//! Random command sequences are replayed and the game invariants are checked after every step.

use std::collections::HashSet;

use proptest::prelude::*;
use uuid::Uuid;

use crate::state::{
    game::{
        Flash, GameState, MAX_PLAYERS, Mode, Outcome, PlayerStatus, QaEntry,
        RECENT_EVENTS_CAPACITY,
    },
    state_machine::{Command, StatusChange, apply},
};

/// Command with player references expressed as roster positions, resolved against the
/// state it is applied to. Positions past the roster name an unknown player.
#[derive(Debug, Clone)]
enum Step {
    SetPlayers(Vec<String>),
    Select(usize),
    Result(Outcome),
    SetStatus(usize, StatusChange),
    SetScore(usize, f64),
    SetCounts(usize, Option<f64>, Option<f64>),
    SetMode(Mode),
    SetThresholds(Option<f64>, Option<f64>),
    SetDeltas(Option<f64>, Option<f64>),
    LoadQuiz(usize),
    Next,
    Prev,
    ToggleReveal,
    AddLog(String),
    SetFlash(Option<(usize, Outcome)>),
}

fn player_id(state: &GameState, index: usize) -> Uuid {
    state.player_at(index).map(|(id, _)| id).unwrap_or(Uuid::nil())
}

impl Step {
    fn resolve(&self, state: &GameState) -> Command {
        match self.clone() {
            Step::SetPlayers(names) => Command::SetPlayers { names },
            Step::Select(index) => Command::SelectPlayer {
                player_id: Some(player_id(state, index)),
            },
            Step::Result(outcome) => Command::ApplyResult { outcome },
            Step::SetStatus(index, status) => Command::SetStatus {
                player_id: player_id(state, index),
                status,
            },
            Step::SetScore(index, value) => Command::SetScore {
                player_id: player_id(state, index),
                value,
            },
            Step::SetCounts(index, correct, wrong) => Command::SetCounts {
                player_id: player_id(state, index),
                correct,
                wrong,
            },
            Step::SetMode(mode) => Command::SetMode { mode },
            Step::SetThresholds(correct_target, wrong_target) => Command::SetThresholds {
                correct_target,
                wrong_target,
            },
            Step::SetDeltas(correct, wrong) => Command::SetDeltas { correct, wrong },
            Step::LoadQuiz(count) => Command::LoadQuiz {
                entries: (1..=count)
                    .map(|n| QaEntry {
                        question_id: format!("q{n}"),
                        question: format!("question {n}"),
                        answer: format!("answer {n}"),
                    })
                    .collect(),
            },
            Step::Next => Command::NextQuestion,
            Step::Prev => Command::PrevQuestion,
            Step::ToggleReveal => Command::ToggleReveal,
            Step::AddLog(text) => Command::AddLog { text },
            Step::SetFlash(target) => Command::SetFlash {
                flash: target.map(|(index, kind)| Flash {
                    player_id: player_id(state, index),
                    kind,
                }),
            },
        }
    }
}

fn outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![Just(Outcome::Correct), Just(Outcome::Wrong)]
}

fn status_change() -> impl Strategy<Value = StatusChange> {
    prop_oneof![
        Just(StatusChange::Active),
        Just(StatusChange::Won),
        Just(StatusChange::Lost),
    ]
}

/// Operator numbers, including the non-finite and fractional ones the engine must coerce.
fn operator_number() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => -10.0..10.0f64,
        1 => any::<f64>(),
        1 => Just(f64::NAN),
    ]
}

fn seat() -> impl Strategy<Value = usize> {
    0..MAX_PLAYERS + 2
}

fn optional_number() -> impl Strategy<Value = Option<f64>> {
    proptest::option::of(operator_number())
}

/// Roster, selection and scoring commands.
fn player_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        2 => prop::collection::vec("[ A-Za-z]{0,6}", 0..12).prop_map(Step::SetPlayers),
        3 => seat().prop_map(Step::Select),
        8 => outcome().prop_map(Step::Result),
        2 => (seat(), status_change()).prop_map(|(index, status)| Step::SetStatus(index, status)),
        1 => (seat(), operator_number()).prop_map(|(index, value)| Step::SetScore(index, value)),
        1 => (seat(), optional_number(), optional_number())
            .prop_map(|(index, correct, wrong)| Step::SetCounts(index, correct, wrong)),
    ]
}

/// Rule, quiz navigation and presentation commands.
fn game_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        1 => prop_oneof![Just(Mode::Simple), Just(Mode::CountThreshold)].prop_map(Step::SetMode),
        1 => (optional_number(), optional_number())
            .prop_map(|(correct, wrong)| Step::SetThresholds(correct, wrong)),
        1 => (optional_number(), optional_number())
            .prop_map(|(correct, wrong)| Step::SetDeltas(correct, wrong)),
        1 => (0..5usize).prop_map(Step::LoadQuiz),
        2 => Just(Step::Next),
        2 => Just(Step::Prev),
        2 => Just(Step::ToggleReveal),
        1 => "[a-z ]{0,12}".prop_map(Step::AddLog),
        1 => proptest::option::of((seat(), outcome())).prop_map(Step::SetFlash),
    ]
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![17 => player_step(), 12 => game_step()]
}

/// Starts with a seated roster so scoring steps have targets from the first step on.
fn game_start() -> impl Strategy<Value = GameState> {
    prop_oneof![Just(Mode::Simple), Just(Mode::CountThreshold)].prop_map(|mode| {
        let seated = apply(
            &GameState::default(),
            Command::SetPlayers {
                names: ["Ann", "Bob", "Cid", "Dee"].map(String::from).to_vec(),
            },
        );
        apply(&seated, Command::SetMode { mode })
    })
}

fn won_ranks(state: &GameState) -> Vec<u32> {
    state
        .players
        .values()
        .filter_map(|player| match player.status {
            PlayerStatus::Won { rank } => Some(rank),
            _ => None,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: structural bounds hold after every command.
    /// Roster capped with unique ids, selection resolves, log bounded, thresholds positive,
    /// question index in range.
    #[test]
    fn prop_state_stays_within_bounds(
        start in game_start(),
        steps in prop::collection::vec(step(), 1..60),
    ) {
        let mut state = start;
        for step in steps {
            let command = step.resolve(&state);
            let previous_ids: HashSet<Uuid> = state.players.keys().copied().collect();
            state = apply(&state, command);

            prop_assert!(state.players.len() <= MAX_PLAYERS);
            let ids: HashSet<Uuid> = state.players.keys().copied().collect();
            prop_assert_eq!(ids.len(), state.players.len());
            if let Step::SetPlayers(_) = step {
                prop_assert!(ids.is_disjoint(&previous_ids), "roster ids must be fresh");
            }
            if let Some(selected) = state.selected_player_id {
                prop_assert!(state.players.contains_key(&selected));
            }
            prop_assert!(state.recent_events.len() <= RECENT_EVENTS_CAPACITY);
            prop_assert!(state.thresholds.correct_target >= 1);
            prop_assert!(state.thresholds.wrong_target >= 1);
            if !state.quiz.is_empty() {
                prop_assert!(state.current_question_index < state.quiz.len());
            }
        }
    }

    /// Property: win ranks are handed out in strictly increasing order.
    /// Every newly won player takes a rank above any rank given out since the last roster
    /// change, and ranks held at the same time never collide.
    #[test]
    fn prop_win_ranks_strictly_increase(
        start in game_start(),
        steps in prop::collection::vec(step(), 1..80),
    ) {
        let mut state = start;
        let mut highest_given = 0u32;
        for step in steps {
            let command = step.resolve(&state);
            let before = state.clone();
            state = apply(&state, command);

            if let Step::SetPlayers(_) = step {
                highest_given = 0;
                prop_assert_eq!(state.next_win_rank, 1);
            } else {
                prop_assert!(state.next_win_rank >= before.next_win_rank);
            }

            for (id, player) in &state.players {
                let PlayerStatus::Won { rank } = player.status else { continue };
                let unchanged = before
                    .players
                    .get(id)
                    .is_some_and(|old| old.status == player.status);
                if !unchanged {
                    prop_assert!(rank > highest_given, "rank {} after {}", rank, highest_given);
                    highest_given = rank;
                }
                prop_assert!(rank < state.next_win_rank);
            }

            let ranks = won_ranks(&state);
            let distinct: HashSet<u32> = ranks.iter().copied().collect();
            prop_assert_eq!(distinct.len(), ranks.len());
        }
    }

    /// Property: automatic scoring never touches a decided player, and only ever touches
    /// the selected one.
    #[test]
    fn prop_scoring_leaves_decided_and_unselected_players_alone(
        start in game_start(),
        steps in prop::collection::vec(step(), 1..80),
    ) {
        let mut state = start;
        for step in steps {
            let command = step.resolve(&state);
            let before = state.clone();
            state = apply(&state, command);

            if !matches!(step, Step::Result(_)) {
                continue;
            }
            for (id, player) in &before.players {
                let scored = before.selected_player_id == Some(*id) && !player.status.is_decided();
                if !scored {
                    prop_assert_eq!(&state.players[id], player);
                }
            }
            if let Some((_, selected)) = before.selected_player() {
                if selected.status.is_decided() {
                    prop_assert_eq!(state.active_flash, before.active_flash);
                }
            }
        }
    }
}
