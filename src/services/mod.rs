/// Operator actions on the authoritative state.
pub mod control_service;
/// Read access to the in-process display.
pub mod display_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Keyboard shortcut mapping.
pub mod keyboard;
/// CSV quiz ingestion.
pub mod quiz_import;
/// Server-Sent Events forwarding of snapshots.
pub mod sse_service;
