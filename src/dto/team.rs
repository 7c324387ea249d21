use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dao::models::{RecordId, TeamEntity};
use crate::dto::{player::PlayerSummary, validation::validate_display_name};

/// Payload creating or renaming a team.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct TeamInput {
    /// Display name; surrounding whitespace is trimmed.
    #[validate(custom(function = "validate_display_name"))]
    pub name: String,
}

/// One row of the team list.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamListItem {
    /// Team identifier.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// Number of roster entries.
    pub player_count: usize,
}

impl From<(RecordId, TeamEntity)> for TeamListItem {
    fn from((id, team): (RecordId, TeamEntity)) -> Self {
        Self {
            id,
            name: team.name,
            player_count: team.players.len(),
        }
    }
}

/// Team with its resolved roster.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamDetail {
    /// Team identifier.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// Roster in registration order.
    pub players: Vec<PlayerSummary>,
}
