use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use axum_valid::Valid;

use crate::{
    dao::models::RecordId,
    dto::player::{PlayerInput, PlayerSummary},
    error::AppError,
    services::team_service,
    state::SharedState,
};

/// Individual player records.
pub fn router() -> Router<SharedState> {
    Router::new().route(
        "/players/{id}",
        get(get_player).put(update_player).delete(delete_player),
    )
}

/// Retrieve a single player.
#[utoipa::path(
    get,
    path = "/players/{id}",
    tag = "players",
    params(("id" = u32, Path, description = "Identifier of the player")),
    responses((status = 200, description = "Player", body = PlayerSummary))
)]
pub async fn get_player(
    State(state): State<SharedState>,
    Path(id): Path<RecordId>,
) -> Result<Json<PlayerSummary>, AppError> {
    Ok(Json(team_service::get_player(&state, id).await?))
}

/// Replace a player's name and number; team membership is unchanged.
#[utoipa::path(
    put,
    path = "/players/{id}",
    tag = "players",
    request_body = PlayerInput,
    params(("id" = u32, Path, description = "Identifier of the player")),
    responses((status = 200, description = "Player updated", body = PlayerSummary))
)]
pub async fn update_player(
    State(state): State<SharedState>,
    Path(id): Path<RecordId>,
    Valid(Json(payload)): Valid<Json<PlayerInput>>,
) -> Result<Json<PlayerSummary>, AppError> {
    Ok(Json(team_service::update_player(&state, id, payload).await?))
}

/// Delete a player and drop it from its team's roster.
#[utoipa::path(
    delete,
    path = "/players/{id}",
    tag = "players",
    params(("id" = u32, Path, description = "Identifier of the player")),
    responses((status = 204, description = "Player deleted"))
)]
pub async fn delete_player(
    State(state): State<SharedState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    team_service::delete_player(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
