use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the quiz scoreboard.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::control::get_state,
        crate::routes::control::post_command,
        crate::routes::control::post_players,
        crate::routes::control::post_quiz,
        crate::routes::control::post_key,
        crate::routes::control::get_log,
        crate::routes::display::get_view,
        crate::routes::sse::display_stream,
        crate::routes::view::route_view,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::control::PlayersRequest,
            crate::dto::control::QuizImportRequest,
            crate::dto::control::QuizImportResponse,
            crate::dto::control::KeyPressRequest,
            crate::dto::control::KeyPressResponse,
            crate::dto::control::LogLine,
            crate::dto::display::DisplayView,
            crate::dto::display::QuestionCard,
            crate::dto::display::PlayerCard,
            crate::dto::display::ScoreBand,
            crate::dto::sse::StateEnvelope,
            crate::dto::view::ViewMode,
            crate::dto::view::ViewResponse,
            crate::state::game::GameState,
            crate::state::state_machine::Command,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "control", description = "Operator commands on the authoritative game state"),
        (name = "display", description = "Read-only scoreboard view"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "view", description = "Startup routing between control and display"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/healthcheck",
            "/control/state",
            "/control/commands",
            "/control/players",
            "/control/quiz",
            "/control/keys",
            "/control/log",
            "/display/view",
            "/sse/display",
            "/view",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn player_references_are_uuid_strings() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schemas = &doc["components"]["schemas"];

        let flash = &schemas["Flash"]["properties"]["player_id"];
        assert_eq!(flash["type"], "string");
        assert_eq!(flash["format"], "uuid");

        let selected = serde_json::to_string(&schemas["GameState"]["properties"]["selected_player_id"])
            .unwrap();
        assert!(selected.contains("uuid"), "{selected}");
        assert!(schemas["Command"].is_object());
    }

    #[test]
    fn response_fields_carry_descriptions() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schemas = &doc["components"]["schemas"];
        for name in [
            "QuizImportResponse",
            "KeyPressResponse",
            "LogLine",
            "DisplayView",
            "QuestionCard",
            "PlayerCard",
            "ViewResponse",
        ] {
            let properties = schemas[name]["properties"]
                .as_object()
                .unwrap_or_else(|| panic!("{name} has no properties"));
            for (field, property) in properties {
                if property.get("$ref").is_some() || property.get("oneOf").is_some() {
                    continue;
                }
                let description = property["description"].as_str().unwrap_or_default();
                assert!(!description.is_empty(), "{name}.{field} is undocumented");
            }
        }
    }
}
