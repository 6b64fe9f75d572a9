//! Application-level configuration loading, including the rule set the first game starts with.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::{
    control::DEFAULT_FLASH_CLEAR_DELAY,
    game::{Deltas, GameState, Mode, Thresholds},
    state_machine::{coerce_int, coerce_threshold},
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "QUIZ_SCOREBOARD_CONFIG_PATH";
/// Per-subscriber buffer of the snapshot channel.
const DEFAULT_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    flash_clear_delay: Duration,
    channel_capacity: usize,
    mode: Mode,
    thresholds: Thresholds,
    deltas: Deltas,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        mode = app_config.mode.as_str(),
                        flash_clear_ms = app_config.flash_clear_delay.as_millis() as u64,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a configuration document; absent fields keep their defaults.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// Delay before an automatic flash clear.
    pub fn flash_clear_delay(&self) -> Duration {
        self.flash_clear_delay
    }

    /// Buffer size of the snapshot channel.
    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    /// Empty game seeded with the configured rules.
    pub fn initial_state(&self) -> GameState {
        GameState::with_rules(self.mode, self.thresholds, self.deltas)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    flash_clear_ms: u64,
    channel_capacity: usize,
    rules: RawRules,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            flash_clear_ms: DEFAULT_FLASH_CLEAR_DELAY.as_millis() as u64,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            rules: RawRules::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
/// Rule values as written by the operator; coerced the same way commands are.
struct RawRules {
    mode: Mode,
    correct_target: f64,
    wrong_target: f64,
    correct_delta: f64,
    wrong_delta: f64,
}

impl Default for RawRules {
    fn default() -> Self {
        let thresholds = Thresholds::default();
        let deltas = Deltas::default();
        Self {
            mode: Mode::default(),
            correct_target: f64::from(thresholds.correct_target),
            wrong_target: f64::from(thresholds.wrong_target),
            correct_delta: deltas.correct as f64,
            wrong_delta: deltas.wrong as f64,
        }
    }
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let rules = value.rules;
        Self {
            flash_clear_delay: Duration::from_millis(value.flash_clear_ms),
            channel_capacity: value.channel_capacity.max(1),
            mode: rules.mode,
            thresholds: Thresholds {
                correct_target: coerce_threshold(rules.correct_target),
                wrong_target: coerce_threshold(rules.wrong_target),
            },
            deltas: Deltas {
                correct: coerce_int(rules.correct_delta),
                wrong: coerce_int(rules.wrong_delta),
            },
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_built_in_rules() {
        let config = AppConfig::default();
        assert_eq!(config.flash_clear_delay(), Duration::from_millis(1_500));
        assert_eq!(config.channel_capacity(), 16);

        let state = config.initial_state();
        assert_eq!(state.mode, Mode::Simple);
        assert_eq!(state.thresholds, Thresholds::default());
        assert_eq!(state.deltas, Deltas::default());
        assert_eq!(state.next_win_rank, 1);
    }

    #[test]
    fn partial_document_keeps_remaining_defaults() {
        let config =
            AppConfig::from_json(r#"{"rules":{"mode":"count_threshold","wrong_target":4}}"#)
                .unwrap();
        let state = config.initial_state();
        assert_eq!(state.mode, Mode::CountThreshold);
        assert_eq!(state.thresholds.correct_target, 3);
        assert_eq!(state.thresholds.wrong_target, 4);
        assert_eq!(config.flash_clear_delay(), DEFAULT_FLASH_CLEAR_DELAY);
    }

    #[test]
    fn rule_values_are_coerced() {
        let config = AppConfig::from_json(
            r#"{"flash_clear_ms":200,"channel_capacity":0,
                "rules":{"correct_target":0,"wrong_target":2.9,"correct_delta":2.7,"wrong_delta":-1.5}}"#,
        )
        .unwrap();
        let state = config.initial_state();
        assert_eq!(state.thresholds.correct_target, 1);
        assert_eq!(state.thresholds.wrong_target, 2);
        assert_eq!(state.deltas.correct, 2);
        assert_eq!(state.deltas.wrong, -1);
        assert_eq!(config.channel_capacity(), 1);
        assert_eq!(config.flash_clear_delay(), Duration::from_millis(200));
    }

    #[test]
    fn invalid_document_is_rejected() {
        assert!(AppConfig::from_json(r#"{"rules":{"mode":"sudden_death"}}"#).is_err());
        assert!(AppConfig::from_json("not json").is_err());
    }
}
