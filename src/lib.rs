//! Library crate for quiz-scoreboard, exposing modules for binaries and integration tests.

/// Runtime configuration loaded from the environment.
pub mod config;
/// Request and response payloads.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// HTTP route trees.
pub mod routes;
/// Business logic behind the routes.
pub mod services;
/// Game model, transition engine and the surfaces sharing it.
pub mod state;
