//! Team and roster operations backing the `/teams` and `/players` routes.

use tracing::info;

use crate::{
    dao::models::{PlayerEntity, RecordId, TeamEntity},
    dto::{
        player::{PlayerInput, PlayerSummary},
        team::{TeamDetail, TeamInput, TeamListItem},
    },
    error::ServiceError,
    state::SharedState,
};

fn team_not_found(id: RecordId) -> ServiceError {
    ServiceError::NotFound(format!("team `{id}` not found"))
}

fn player_not_found(id: RecordId) -> ServiceError {
    ServiceError::NotFound(format!("player `{id}` not found"))
}

/// List teams with their roster sizes.
pub async fn list_teams(state: &SharedState) -> Result<Vec<TeamListItem>, ServiceError> {
    let teams = state.engine().teams().await?;
    Ok(teams.into_iter().map(Into::into).collect())
}

/// Register a team with an empty roster.
pub async fn create_team(
    state: &SharedState,
    request: TeamInput,
) -> Result<TeamDetail, ServiceError> {
    let team = TeamEntity::new(request.name.trim());
    let id = state.engine().add_team(team.clone()).await?;
    info!(team_id = id, name = %team.name, "team created");

    Ok(TeamDetail {
        id,
        name: team.name,
        players: Vec::new(),
    })
}

/// Fetch a team with its resolved roster.
pub async fn get_team(state: &SharedState, id: RecordId) -> Result<TeamDetail, ServiceError> {
    let engine = state.engine();
    let team = engine.team(id).await?.ok_or_else(|| team_not_found(id))?;
    let players = engine.players(id).await?;

    Ok(TeamDetail {
        id,
        name: team.name,
        players: players.into_iter().map(Into::into).collect(),
    })
}

/// Rename a team; the roster is left untouched.
pub async fn update_team(
    state: &SharedState,
    id: RecordId,
    request: TeamInput,
) -> Result<TeamDetail, ServiceError> {
    let team = state.engine().rename_team(id, request.name.trim()).await?;
    info!(team_id = id, name = %team.name, "team renamed");

    get_team(state, id).await
}

/// Delete a team and the players on its roster.
pub async fn delete_team(state: &SharedState, id: RecordId) -> Result<(), ServiceError> {
    if !state.engine().remove_team(id).await? {
        return Err(team_not_found(id));
    }
    info!(team_id = id, "team deleted");
    Ok(())
}

/// Players of a team in roster order.
pub async fn list_players(
    state: &SharedState,
    team_id: RecordId,
) -> Result<Vec<PlayerSummary>, ServiceError> {
    let players = state.engine().players(team_id).await?;
    Ok(players.into_iter().map(Into::into).collect())
}

/// Register a player on `team_id`.
pub async fn add_player(
    state: &SharedState,
    team_id: RecordId,
    request: PlayerInput,
) -> Result<PlayerSummary, ServiceError> {
    let mut player: PlayerEntity = request.into();
    player.name = player.name.trim().to_string();

    let id = state.engine().add_player(team_id, player.clone()).await?;
    player.team_id = Some(team_id);
    info!(team_id, player_id = id, "player registered");

    Ok((id, player).into())
}

/// Fetch a single player.
pub async fn get_player(state: &SharedState, id: RecordId) -> Result<PlayerSummary, ServiceError> {
    let player = state
        .engine()
        .player(id)
        .await?
        .ok_or_else(|| player_not_found(id))?;
    Ok((id, player).into())
}

/// Replace a player's name and number.
pub async fn update_player(
    state: &SharedState,
    id: RecordId,
    request: PlayerInput,
) -> Result<PlayerSummary, ServiceError> {
    let mut player: PlayerEntity = request.into();
    player.name = player.name.trim().to_string();
    state.engine().set_player(id, player).await?;

    get_player(state, id).await
}

/// Delete a player and drop it from its roster.
pub async fn delete_player(state: &SharedState, id: RecordId) -> Result<(), ServiceError> {
    if !state.engine().remove_player(id).await? {
        return Err(player_not_found(id));
    }
    info!(player_id = id, "player deleted");
    Ok(())
}
