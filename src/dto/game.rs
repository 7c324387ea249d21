use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::{
    dao::models::{ActionEntity, ActionKind, GameEntity, RecordId},
    dto::format_system_time,
};

/// Payload starting a new game between two optional teams.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[validate(schema(function = "validate_distinct_sides"))]
pub struct CreateGameRequest {
    /// Registered team playing at home, if any.
    #[serde(default)]
    pub home_team_id: Option<RecordId>,
    /// Registered team playing away, if any; must differ from the home team.
    #[serde(default)]
    pub away_team_id: Option<RecordId>,
}

fn validate_distinct_sides(request: &CreateGameRequest) -> Result<(), ValidationError> {
    match (request.home_team_id, request.away_team_id) {
        (Some(home), Some(away)) if home == away => {
            let mut err = ValidationError::new("same_team");
            err.message = Some("Home and away teams must differ".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

/// Filter applied to the game list.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GamesQuery {
    /// `true` for games still in progress, `false` for finished ones.
    pub active: Option<bool>,
}

/// Scoresheet action kinds accepted by the API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKindDto {
    /// One point.
    FreeThrowMade,
    /// Missed free throw.
    FreeThrowMissed,
    /// Two points.
    TwoPointMade,
    /// Missed two-point attempt.
    TwoPointMissed,
    /// Three points.
    ThreePointMade,
    /// Missed three-point attempt.
    ThreePointMissed,
    /// Rebound, offensive or defensive.
    Rebound,
    /// Pass leading to a made shot.
    Assist,
    /// Ball taken from the opponent.
    Steal,
    /// Blocked shot.
    Block,
    /// Possession lost without a shot.
    Turnover,
    /// Personal foul.
    Foul,
}

impl From<ActionKindDto> for ActionKind {
    fn from(value: ActionKindDto) -> Self {
        match value {
            ActionKindDto::FreeThrowMade => ActionKind::FreeThrowMade,
            ActionKindDto::FreeThrowMissed => ActionKind::FreeThrowMissed,
            ActionKindDto::TwoPointMade => ActionKind::TwoPointMade,
            ActionKindDto::TwoPointMissed => ActionKind::TwoPointMissed,
            ActionKindDto::ThreePointMade => ActionKind::ThreePointMade,
            ActionKindDto::ThreePointMissed => ActionKind::ThreePointMissed,
            ActionKindDto::Rebound => ActionKind::Rebound,
            ActionKindDto::Assist => ActionKind::Assist,
            ActionKindDto::Steal => ActionKind::Steal,
            ActionKindDto::Block => ActionKind::Block,
            ActionKindDto::Turnover => ActionKind::Turnover,
            ActionKindDto::Foul => ActionKind::Foul,
        }
    }
}

impl From<ActionKind> for ActionKindDto {
    fn from(value: ActionKind) -> Self {
        match value {
            ActionKind::FreeThrowMade => ActionKindDto::FreeThrowMade,
            ActionKind::FreeThrowMissed => ActionKindDto::FreeThrowMissed,
            ActionKind::TwoPointMade => ActionKindDto::TwoPointMade,
            ActionKind::TwoPointMissed => ActionKindDto::TwoPointMissed,
            ActionKind::ThreePointMade => ActionKindDto::ThreePointMade,
            ActionKind::ThreePointMissed => ActionKindDto::ThreePointMissed,
            ActionKind::Rebound => ActionKindDto::Rebound,
            ActionKind::Assist => ActionKindDto::Assist,
            ActionKind::Steal => ActionKindDto::Steal,
            ActionKind::Block => ActionKindDto::Block,
            ActionKind::Turnover => ActionKindDto::Turnover,
            ActionKind::Foul => ActionKindDto::Foul,
        }
    }
}

/// Request appending an action to one side of a game.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RecordActionRequest {
    /// What happened.
    pub kind: ActionKindDto,
    /// Player credited with the action; must play for that side when the side has a team.
    #[serde(default)]
    pub player_id: Option<RecordId>,
}

/// Recorded action as exposed by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionDto {
    /// What happened.
    pub kind: ActionKindDto,
    /// Player credited with the action, when known.
    pub player_id: Option<RecordId>,
    /// Points the action added to its side.
    pub points: u32,
    /// RFC 3339 timestamp.
    pub recorded_at: String,
}

impl From<ActionEntity> for ActionDto {
    fn from(action: ActionEntity) -> Self {
        Self {
            kind: action.kind.into(),
            player_id: action.player_id,
            points: action.kind.points(),
            recorded_at: format_system_time(action.recorded_at),
        }
    }
}

/// One row of the game list.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameListItem {
    /// Game identifier.
    pub id: RecordId,
    /// `false` once the game is finished.
    pub active: bool,
    /// Home team, when assigned.
    pub home_team_id: Option<RecordId>,
    /// Away team, when assigned.
    pub away_team_id: Option<RecordId>,
    /// Points scored by the home side.
    pub home_score: u32,
    /// Points scored by the away side.
    pub away_score: u32,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl From<(RecordId, GameEntity)> for GameListItem {
    fn from((id, game): (RecordId, GameEntity)) -> Self {
        Self {
            id,
            active: game.active,
            home_team_id: game.home_team_id,
            away_team_id: game.away_team_id,
            home_score: game.home_score(),
            away_score: game.away_score(),
            created_at: format_system_time(game.created_at),
        }
    }
}

/// Full game scoresheet.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameDetail {
    /// Game identifier.
    pub id: RecordId,
    /// `false` once the game is finished.
    pub active: bool,
    /// Home team, when assigned.
    pub home_team_id: Option<RecordId>,
    /// Away team, when assigned.
    pub away_team_id: Option<RecordId>,
    /// Points scored by the home side.
    pub home_score: u32,
    /// Points scored by the away side.
    pub away_score: u32,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// Home scoresheet in recording order.
    pub home_actions: Vec<ActionDto>,
    /// Away scoresheet in recording order.
    pub away_actions: Vec<ActionDto>,
}

impl From<(RecordId, GameEntity)> for GameDetail {
    fn from((id, game): (RecordId, GameEntity)) -> Self {
        let home_score = game.home_score();
        let away_score = game.away_score();
        Self {
            id,
            active: game.active,
            home_team_id: game.home_team_id,
            away_team_id: game.away_team_id,
            home_score,
            away_score,
            created_at: format_system_time(game.created_at),
            home_actions: game.home_actions.into_iter().map(Into::into).collect(),
            away_actions: game.away_actions.into_iter().map(Into::into).collect(),
        }
    }
}
