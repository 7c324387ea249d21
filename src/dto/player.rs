use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dao::models::{PlayerEntity, RecordId};
use crate::dto::validation::validate_display_name;

/// Payload registering a player on a team, also used to replace one.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PlayerInput {
    /// Display name; surrounding whitespace is trimmed.
    #[validate(custom(function = "validate_display_name"))]
    pub name: String,
    /// Jersey number between 0 and 99.
    #[serde(default)]
    #[validate(range(max = 99))]
    pub number: Option<u8>,
}

impl From<PlayerInput> for PlayerEntity {
    fn from(value: PlayerInput) -> Self {
        PlayerEntity::new(value.name, value.number)
    }
}

/// Player projection returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerSummary {
    /// Player identifier.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// Jersey number, if assigned.
    pub number: Option<u8>,
    /// Team the player is registered on.
    pub team_id: Option<RecordId>,
}

impl From<(RecordId, PlayerEntity)> for PlayerSummary {
    fn from((id, player): (RecordId, PlayerEntity)) -> Self {
        Self {
            id,
            name: player.name,
            number: player.number,
            team_id: player.team_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jersey_numbers_above_99_are_rejected() {
        let input = PlayerInput {
            name: "Ana".into(),
            number: Some(100),
        };
        assert!(input.validate().is_err());

        let input = PlayerInput {
            name: "Ana".into(),
            number: None,
        };
        assert!(input.validate().is_ok());
    }
}
