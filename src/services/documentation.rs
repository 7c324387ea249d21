use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for SwishTicker Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::health::integrity,
        crate::routes::teams::list_teams,
        crate::routes::teams::create_team,
        crate::routes::teams::get_team,
        crate::routes::teams::update_team,
        crate::routes::teams::delete_team,
        crate::routes::teams::list_players,
        crate::routes::teams::add_player,
        crate::routes::players::get_player,
        crate::routes::players::update_player,
        crate::routes::players::delete_player,
        crate::routes::games::list_games,
        crate::routes::games::create_game,
        crate::routes::games::get_game,
        crate::routes::games::delete_game,
        crate::routes::games::add_home_action,
        crate::routes::games::add_away_action,
        crate::routes::games::finish_game,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::integrity::IntegrityResponse,
            crate::dto::integrity::DanglingEntry,
            crate::dto::integrity::RosterEntry,
            crate::dto::integrity::GameTeamEntry,
            crate::dto::team::TeamInput,
            crate::dto::team::TeamListItem,
            crate::dto::team::TeamDetail,
            crate::dto::player::PlayerInput,
            crate::dto::player::PlayerSummary,
            crate::dto::game::CreateGameRequest,
            crate::dto::game::RecordActionRequest,
            crate::dto::game::ActionKindDto,
            crate::dto::game::ActionDto,
            crate::dto::game::GameListItem,
            crate::dto::game::GameDetail,
        )
    ),
    tags(
        (name = "health", description = "Health and consistency checks"),
        (name = "teams", description = "Teams and their rosters"),
        (name = "players", description = "Individual player records"),
        (name = "games", description = "Games and scoresheet actions"),
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
            "/integrity",
            "/teams",
            "/teams/{id}",
            "/teams/{id}/players",
            "/players/{id}",
            "/games",
            "/games/{id}",
            "/games/{id}/home/actions",
            "/games/{id}/away/actions",
            "/games/{id}/finish",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
