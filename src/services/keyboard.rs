//! Operator keyboard shortcuts, mapped onto the same commands the control buttons issue.

use crate::state::{
    game::{GameState, MAX_PLAYERS, Outcome},
    state_machine::Command,
};

/// Actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// `n`
    NextQuestion,
    /// `p`
    PrevQuestion,
    /// `a`
    ToggleReveal,
    /// Zero-based roster position.
    SelectPlayer(usize),
    /// `Enter`
    Correct,
    /// `Backspace`
    Wrong,
}

/// Resolve a key name (as reported by the browser) to a shortcut.
///
/// Keys pressed while an editable element has focus are never shortcuts.
pub fn shortcut_for_key(key: &str, editable_target: bool) -> Option<Shortcut> {
    if editable_target {
        return None;
    }

    match key {
        "n" | "N" => Some(Shortcut::NextQuestion),
        "p" | "P" => Some(Shortcut::PrevQuestion),
        "a" | "A" => Some(Shortcut::ToggleReveal),
        "Enter" => Some(Shortcut::Correct),
        "Backspace" => Some(Shortcut::Wrong),
        _ => player_digit(key).map(Shortcut::SelectPlayer),
    }
}

fn player_digit(key: &str) -> Option<usize> {
    let mut chars = key.chars();
    let digit = chars.next()?.to_digit(10)? as usize;
    if chars.next().is_some() || !(1..=MAX_PLAYERS).contains(&digit) {
        return None;
    }
    Some(digit - 1)
}

/// Command to dispatch for `shortcut`, if any.
///
/// Selecting an empty seat yields nothing but the key still counts as handled.
pub fn command_for(shortcut: Shortcut, state: &GameState) -> Option<Command> {
    match shortcut {
        Shortcut::NextQuestion => Some(Command::NextQuestion),
        Shortcut::PrevQuestion => Some(Command::PrevQuestion),
        Shortcut::ToggleReveal => Some(Command::ToggleReveal),
        Shortcut::SelectPlayer(index) => state.player_at(index).map(|(id, _)| {
            Command::SelectPlayer {
                player_id: Some(id),
            }
        }),
        Shortcut::Correct => Some(Command::ApplyResult {
            outcome: Outcome::Correct,
        }),
        Shortcut::Wrong => Some(Command::ApplyResult {
            outcome: Outcome::Wrong,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::state_machine::apply;

    #[test]
    fn letters_are_case_insensitive() {
        for (lower, upper, expected) in [
            ("n", "N", Shortcut::NextQuestion),
            ("p", "P", Shortcut::PrevQuestion),
            ("a", "A", Shortcut::ToggleReveal),
        ] {
            assert_eq!(shortcut_for_key(lower, false), Some(expected));
            assert_eq!(shortcut_for_key(upper, false), Some(expected));
        }
    }

    #[test]
    fn scoring_keys() {
        assert_eq!(shortcut_for_key("Enter", false), Some(Shortcut::Correct));
        assert_eq!(shortcut_for_key("Backspace", false), Some(Shortcut::Wrong));
    }

    #[test]
    fn digits_one_through_eight_select_by_position() {
        assert_eq!(shortcut_for_key("1", false), Some(Shortcut::SelectPlayer(0)));
        assert_eq!(shortcut_for_key("8", false), Some(Shortcut::SelectPlayer(7)));
        assert_eq!(shortcut_for_key("0", false), None);
        assert_eq!(shortcut_for_key("9", false), None);
        assert_eq!(shortcut_for_key("12", false), None);
    }

    #[test]
    fn editable_focus_disables_everything() {
        for key in ["n", "Enter", "Backspace", "3"] {
            assert_eq!(shortcut_for_key(key, true), None);
        }
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        for key in ["x", "Escape", " ", ""] {
            assert_eq!(shortcut_for_key(key, false), None);
        }
    }

    #[test]
    fn select_resolves_against_current_roster() {
        let state = apply(
            &GameState::default(),
            Command::SetPlayers {
                names: vec!["Ann".into(), "Bob".into()],
            },
        );
        let (bob, _) = state.player_at(1).unwrap();

        assert_eq!(
            command_for(Shortcut::SelectPlayer(1), &state),
            Some(Command::SelectPlayer {
                player_id: Some(bob)
            })
        );
        assert_eq!(command_for(Shortcut::SelectPlayer(5), &state), None);
        assert_eq!(
            command_for(Shortcut::Wrong, &state),
            Some(Command::ApplyResult {
                outcome: Outcome::Wrong
            })
        );
    }
}
