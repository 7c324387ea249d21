use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Integer identifier shared by every record kind; allocated from one counter.
pub type RecordId = u32;

/// Team record persisted under its identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Display name of the team.
    pub name: String,
    /// Identifiers of the players registered on this team, in roster order.
    #[serde(default)]
    pub players: Vec<RecordId>,
}

impl TeamEntity {
    /// Team with an empty roster.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            players: Vec::new(),
        }
    }

    /// Append `player_id` to the end of the roster.
    pub fn add_player(&mut self, player_id: RecordId) {
        self.players.push(player_id);
    }

    /// Drop the first occurrence of `player_id` from the roster; returns whether one was found.
    pub fn remove_player(&mut self, player_id: RecordId) -> bool {
        match self.players.iter().position(|id| *id == player_id) {
            Some(index) => {
                self.players.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Player record persisted under its identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Display name of the player.
    pub name: String,
    /// Jersey number, if one was assigned.
    #[serde(default)]
    pub number: Option<u8>,
    /// Back-reference to the owning team. Set by the query engine on insert.
    #[serde(default)]
    pub team_id: Option<RecordId>,
}

impl PlayerEntity {
    /// Player not yet attached to a team.
    pub fn new(name: impl Into<String>, number: Option<u8>) -> Self {
        Self {
            name: name.into(),
            number,
            team_id: None,
        }
    }
}

/// Kind of event recorded on the scoresheet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Successful free throw, worth one point.
    FreeThrowMade,
    /// Missed free throw.
    FreeThrowMissed,
    /// Successful field goal inside the arc, worth two points.
    TwoPointMade,
    /// Missed two-point attempt.
    TwoPointMissed,
    /// Successful shot from beyond the arc, worth three points.
    ThreePointMade,
    /// Missed three-point attempt.
    ThreePointMissed,
    /// Offensive or defensive rebound.
    Rebound,
    /// Pass leading directly to a made shot.
    Assist,
    /// Ball taken from the opposing side.
    Steal,
    /// Blocked shot.
    Block,
    /// Possession lost without a shot attempt.
    Turnover,
    /// Personal foul.
    Foul,
}

impl ActionKind {
    /// Points credited to the scoring side.
    pub fn points(self) -> u32 {
        match self {
            ActionKind::FreeThrowMade => 1,
            ActionKind::TwoPointMade => 2,
            ActionKind::ThreePointMade => 3,
            _ => 0,
        }
    }
}

/// A single scoring action appended to one side of a game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionEntity {
    /// What happened.
    pub kind: ActionKind,
    /// Player credited with the action, when known.
    #[serde(default)]
    pub player_id: Option<RecordId>,
    /// Wall-clock time the action was recorded.
    pub recorded_at: SystemTime,
}

impl ActionEntity {
    /// Action stamped with the current time.
    pub fn new(kind: ActionKind, player_id: Option<RecordId>) -> Self {
        Self {
            kind,
            player_id,
            recorded_at: SystemTime::now(),
        }
    }
}

/// Game record persisted under its identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    /// Team playing the home side, when one is assigned.
    #[serde(default)]
    pub home_team_id: Option<RecordId>,
    /// Team playing the away side, when one is assigned.
    #[serde(default)]
    pub away_team_id: Option<RecordId>,
    /// Home scoresheet in recording order.
    #[serde(default)]
    pub home_actions: Vec<ActionEntity>,
    /// Away scoresheet in recording order.
    #[serde(default)]
    pub away_actions: Vec<ActionEntity>,
    /// False once the game has been finished.
    pub active: bool,
    /// Wall-clock time the game was created.
    pub created_at: SystemTime,
}

impl GameEntity {
    /// Start a new active game with empty scoresheets.
    pub fn new(home_team_id: Option<RecordId>, away_team_id: Option<RecordId>) -> Self {
        Self {
            home_team_id,
            away_team_id,
            home_actions: Vec::new(),
            away_actions: Vec::new(),
            active: true,
            created_at: SystemTime::now(),
        }
    }

    /// Whether the game still accepts actions.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Append to the home scoresheet.
    pub fn add_home_action(&mut self, action: ActionEntity) {
        self.home_actions.push(action);
    }

    /// Append to the away scoresheet.
    pub fn add_away_action(&mut self, action: ActionEntity) {
        self.away_actions.push(action);
    }

    /// Clear every side played by `team_id`; returns whether any side changed.
    pub fn unassign_team(&mut self, team_id: RecordId) -> bool {
        let mut changed = false;
        for side in [&mut self.home_team_id, &mut self.away_team_id] {
            if *side == Some(team_id) {
                *side = None;
                changed = true;
            }
        }
        changed
    }

    /// Points scored by the home side.
    pub fn home_score(&self) -> u32 {
        self.home_actions.iter().map(|a| a.kind.points()).sum()
    }

    /// Points scored by the away side.
    pub fn away_score(&self) -> u32 {
        self.away_actions.iter().map(|a| a.kind.points()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_sum_made_shots_only() {
        let mut game = GameEntity::new(Some(1), Some(2));
        game.add_home_action(ActionEntity::new(ActionKind::ThreePointMade, None));
        game.add_home_action(ActionEntity::new(ActionKind::TwoPointMissed, None));
        game.add_home_action(ActionEntity::new(ActionKind::FreeThrowMade, None));
        game.add_away_action(ActionEntity::new(ActionKind::Foul, Some(7)));
        game.add_away_action(ActionEntity::new(ActionKind::TwoPointMade, Some(7)));

        assert_eq!(game.home_score(), 4);
        assert_eq!(game.away_score(), 2);
    }

    #[test]
    fn remove_player_drops_first_occurrence() {
        let mut team = TeamEntity::new("Hawks");
        team.add_player(3);
        team.add_player(5);
        team.add_player(3);

        assert!(team.remove_player(3));
        assert_eq!(team.players, vec![5, 3]);
        assert!(!team.remove_player(9));
    }

    #[test]
    fn unassign_team_clears_only_matching_sides() {
        let mut game = GameEntity::new(Some(1), Some(2));
        assert!(game.unassign_team(1));
        assert_eq!((game.home_team_id, game.away_team_id), (None, Some(2)));
        assert!(!game.unassign_team(1));
    }

    #[test]
    fn team_without_roster_field_decodes() {
        let team: TeamEntity = serde_json::from_str(r#"{"name":"Bulls"}"#).unwrap();
        assert!(team.players.is_empty());
    }
}
