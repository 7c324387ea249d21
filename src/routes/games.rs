use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dao::models::RecordId,
    dto::game::{CreateGameRequest, GameDetail, GameListItem, GamesQuery, RecordActionRequest},
    error::AppError,
    services::game_service::{self, Side},
    state::SharedState,
};

/// Game list, scoresheets, and scoring actions.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route("/games/{id}", get(get_game).delete(delete_game))
        .route("/games/{id}/home/actions", post(add_home_action))
        .route("/games/{id}/away/actions", post(add_away_action))
        .route("/games/{id}/finish", post(finish_game))
}

/// List games, optionally filtered on whether they are still in progress.
#[utoipa::path(
    get,
    path = "/games",
    tag = "games",
    params(GamesQuery),
    responses((status = 200, description = "Games", body = [GameListItem]))
)]
pub async fn list_games(
    State(state): State<SharedState>,
    Query(query): Query<GamesQuery>,
) -> Result<Json<Vec<GameListItem>>, AppError> {
    Ok(Json(game_service::list_games(&state, query).await?))
}

/// Start a new active game.
#[utoipa::path(
    post,
    path = "/games",
    tag = "games",
    request_body = CreateGameRequest,
    responses(
        (status = 201, description = "Game created", body = GameDetail),
        (status = 400, description = "Unknown or duplicated team")
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateGameRequest>>,
) -> Result<(StatusCode, Json<GameDetail>), AppError> {
    let game = game_service::create_game(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

/// Retrieve a game with both scoresheets.
#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "games",
    params(("id" = u32, Path, description = "Identifier of the game")),
    responses((status = 200, description = "Game", body = GameDetail))
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<RecordId>,
) -> Result<Json<GameDetail>, AppError> {
    Ok(Json(game_service::get_game(&state, id).await?))
}

/// Delete a game.
#[utoipa::path(
    delete,
    path = "/games/{id}",
    tag = "games",
    params(("id" = u32, Path, description = "Identifier of the game")),
    responses((status = 204, description = "Game deleted"))
)]
pub async fn delete_game(
    State(state): State<SharedState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    game_service::delete_game(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Record an action for the home side.
#[utoipa::path(
    post,
    path = "/games/{id}/home/actions",
    tag = "games",
    request_body = RecordActionRequest,
    params(("id" = u32, Path, description = "Identifier of the game")),
    responses(
        (status = 200, description = "Updated game", body = GameDetail),
        (status = 409, description = "Game already finished")
    )
)]
pub async fn add_home_action(
    State(state): State<SharedState>,
    Path(id): Path<RecordId>,
    Valid(Json(payload)): Valid<Json<RecordActionRequest>>,
) -> Result<Json<GameDetail>, AppError> {
    Ok(Json(
        game_service::record_action(&state, id, Side::Home, payload).await?,
    ))
}

/// Record an action for the away side.
#[utoipa::path(
    post,
    path = "/games/{id}/away/actions",
    tag = "games",
    request_body = RecordActionRequest,
    params(("id" = u32, Path, description = "Identifier of the game")),
    responses(
        (status = 200, description = "Updated game", body = GameDetail),
        (status = 409, description = "Game already finished")
    )
)]
pub async fn add_away_action(
    State(state): State<SharedState>,
    Path(id): Path<RecordId>,
    Valid(Json(payload)): Valid<Json<RecordActionRequest>>,
) -> Result<Json<GameDetail>, AppError> {
    Ok(Json(
        game_service::record_action(&state, id, Side::Away, payload).await?,
    ))
}

/// Mark a game as finished.
#[utoipa::path(
    post,
    path = "/games/{id}/finish",
    tag = "games",
    params(("id" = u32, Path, description = "Identifier of the game")),
    responses((status = 200, description = "Finished game", body = GameDetail))
)]
pub async fn finish_game(
    State(state): State<SharedState>,
    Path(id): Path<RecordId>,
) -> Result<Json<GameDetail>, AppError> {
    Ok(Json(game_service::finish_game(&state, id).await?))
}
