use tracing::{debug, info};

use crate::{
    dao::{
        models::{ActionEntity, GameEntity, RecordId},
        query_engine::QueryError,
    },
    dto::game::{CreateGameRequest, GameDetail, GameListItem, GamesQuery, RecordActionRequest},
    error::ServiceError,
    state::SharedState,
};

/// Which half of the scoresheet an action is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Home scoresheet.
    Home,
    /// Away scoresheet.
    Away,
}

impl Side {
    fn team_id(self, game: &GameEntity) -> Option<RecordId> {
        match self {
            Side::Home => game.home_team_id,
            Side::Away => game.away_team_id,
        }
    }
}

fn game_not_found(id: RecordId) -> ServiceError {
    ServiceError::NotFound(format!("game `{id}` not found"))
}

/// List games, optionally restricted to active or finished ones.
pub async fn list_games(
    state: &SharedState,
    query: GamesQuery,
) -> Result<Vec<GameListItem>, ServiceError> {
    let engine = state.engine();
    let games = match query.active {
        Some(true) => engine.active_games().await?,
        Some(false) => {
            let mut games = engine.games().await?;
            games.retain(|(_, game)| !game.is_active());
            games
        }
        None => engine.games().await?,
    };
    Ok(games.into_iter().map(Into::into).collect())
}

/// Start a game; each assigned side must name a registered team.
pub async fn create_game(
    state: &SharedState,
    request: CreateGameRequest,
) -> Result<GameDetail, ServiceError> {
    let game = GameEntity::new(request.home_team_id, request.away_team_id);
    let id = match state.engine().add_game(game.clone()).await {
        Ok(id) => id,
        Err(QueryError::NotFound { kind: "team", id }) => {
            return Err(ServiceError::InvalidInput(format!(
                "team `{id}` does not exist"
            )));
        }
        Err(err) => return Err(err.into()),
    };
    info!(
        game_id = id,
        home = ?game.home_team_id,
        away = ?game.away_team_id,
        "game started"
    );

    Ok((id, game).into())
}

/// Fetch a full scoresheet.
pub async fn get_game(state: &SharedState, id: RecordId) -> Result<GameDetail, ServiceError> {
    let game = state
        .engine()
        .game(id)
        .await?
        .ok_or_else(|| game_not_found(id))?;
    Ok((id, game).into())
}

/// Delete a game record.
pub async fn delete_game(state: &SharedState, id: RecordId) -> Result<(), ServiceError> {
    if !state.engine().remove_game(id).await? {
        return Err(game_not_found(id));
    }
    info!(game_id = id, "game deleted");
    Ok(())
}

/// Append an action to `side`, checking the credited player plays for that side.
pub async fn record_action(
    state: &SharedState,
    id: RecordId,
    side: Side,
    request: RecordActionRequest,
) -> Result<GameDetail, ServiceError> {
    let engine = state.engine();
    let game = engine.game(id).await?.ok_or_else(|| game_not_found(id))?;

    if let Some(player_id) = request.player_id {
        let player = engine.player(player_id).await?.ok_or_else(|| {
            ServiceError::InvalidInput(format!("player `{player_id}` does not exist"))
        })?;
        if let Some(team_id) = side.team_id(&game) {
            if player.team_id != Some(team_id) {
                return Err(ServiceError::InvalidInput(format!(
                    "player `{player_id}` does not play for team `{team_id}`"
                )));
            }
        }
    }

    let action = ActionEntity::new(request.kind.into(), request.player_id);
    let updated = match side {
        Side::Home => engine.add_home_action(id, action).await?,
        Side::Away => engine.add_away_action(id, action).await?,
    };
    debug!(game_id = id, ?side, kind = ?request.kind, "action recorded");

    Ok((id, updated).into())
}

/// Close a game to further actions.
pub async fn finish_game(state: &SharedState, id: RecordId) -> Result<GameDetail, ServiceError> {
    let game = state.engine().finish_game(id).await?;
    info!(
        game_id = id,
        home_score = game.home_score(),
        away_score = game.away_score(),
        "game finished"
    );
    Ok((id, game).into())
}
