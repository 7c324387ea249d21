use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use axum_valid::Valid;

use crate::{
    dao::models::RecordId,
    dto::{
        player::{PlayerInput, PlayerSummary},
        team::{TeamDetail, TeamInput, TeamListItem},
    },
    error::AppError,
    services::team_service,
    state::SharedState,
};

/// Team list, team records, and team rosters.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/teams", get(list_teams).post(create_team))
        .route(
            "/teams/{id}",
            get(get_team).put(update_team).delete(delete_team),
        )
        .route("/teams/{id}/players", get(list_players).post(add_player))
}

/// List every team in creation order.
#[utoipa::path(
    get,
    path = "/teams",
    tag = "teams",
    responses((status = 200, description = "Known teams", body = [TeamListItem]))
)]
pub async fn list_teams(
    State(state): State<SharedState>,
) -> Result<Json<Vec<TeamListItem>>, AppError> {
    Ok(Json(team_service::list_teams(&state).await?))
}

/// Create a team with an empty roster.
#[utoipa::path(
    post,
    path = "/teams",
    tag = "teams",
    request_body = TeamInput,
    responses((status = 201, description = "Team created", body = TeamDetail))
)]
pub async fn create_team(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<TeamInput>>,
) -> Result<(StatusCode, Json<TeamDetail>), AppError> {
    let team = team_service::create_team(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

/// Retrieve a team and its roster.
#[utoipa::path(
    get,
    path = "/teams/{id}",
    tag = "teams",
    params(("id" = u32, Path, description = "Identifier of the team")),
    responses(
        (status = 200, description = "Team", body = TeamDetail),
        (status = 404, description = "Unknown team")
    )
)]
pub async fn get_team(
    State(state): State<SharedState>,
    Path(id): Path<RecordId>,
) -> Result<Json<TeamDetail>, AppError> {
    Ok(Json(team_service::get_team(&state, id).await?))
}

/// Rename a team.
#[utoipa::path(
    put,
    path = "/teams/{id}",
    tag = "teams",
    request_body = TeamInput,
    params(("id" = u32, Path, description = "Identifier of the team")),
    responses((status = 200, description = "Team updated", body = TeamDetail))
)]
pub async fn update_team(
    State(state): State<SharedState>,
    Path(id): Path<RecordId>,
    Valid(Json(payload)): Valid<Json<TeamInput>>,
) -> Result<Json<TeamDetail>, AppError> {
    Ok(Json(team_service::update_team(&state, id, payload).await?))
}

/// Delete a team and the players on its roster.
#[utoipa::path(
    delete,
    path = "/teams/{id}",
    tag = "teams",
    params(("id" = u32, Path, description = "Identifier of the team")),
    responses((status = 204, description = "Team deleted"))
)]
pub async fn delete_team(
    State(state): State<SharedState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    team_service::delete_team(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List a team's players in roster order.
#[utoipa::path(
    get,
    path = "/teams/{id}/players",
    tag = "teams",
    params(("id" = u32, Path, description = "Identifier of the team")),
    responses((status = 200, description = "Roster", body = [PlayerSummary]))
)]
pub async fn list_players(
    State(state): State<SharedState>,
    Path(id): Path<RecordId>,
) -> Result<Json<Vec<PlayerSummary>>, AppError> {
    Ok(Json(team_service::list_players(&state, id).await?))
}

/// Register a new player on a team.
#[utoipa::path(
    post,
    path = "/teams/{id}/players",
    tag = "teams",
    request_body = PlayerInput,
    params(("id" = u32, Path, description = "Identifier of the team")),
    responses((status = 201, description = "Player registered", body = PlayerSummary))
)]
pub async fn add_player(
    State(state): State<SharedState>,
    Path(id): Path<RecordId>,
    Valid(Json(payload)): Valid<Json<PlayerInput>>,
) -> Result<(StatusCode, Json<PlayerSummary>), AppError> {
    let player = team_service::add_player(&state, id, payload).await?;
    Ok((StatusCode::CREATED, Json(player)))
}
