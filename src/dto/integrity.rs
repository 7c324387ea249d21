use serde::Serialize;
use utoipa::ToSchema;

use crate::dao::{models::RecordId, query_engine::IntegrityReport};

/// Index entry that has no stored record.
#[derive(Debug, Serialize, ToSchema)]
pub struct DanglingEntry {
    /// Store key of the index list (`team_list`, `game_list`, `player_list`).
    pub index: String,
    /// Identifier listed without a record.
    pub id: RecordId,
}

/// Roster entry naming a player that is not registered.
#[derive(Debug, Serialize, ToSchema)]
pub struct RosterEntry {
    /// Team whose roster holds the entry.
    pub team_id: RecordId,
    /// Unregistered player identifier.
    pub player_id: RecordId,
}

/// Game side assigned to a team that is not registered.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameTeamEntry {
    /// Game naming the team.
    pub game_id: RecordId,
    /// Unregistered team identifier.
    pub team_id: RecordId,
}

/// Outcome of a store-wide consistency check.
#[derive(Debug, Serialize, ToSchema)]
pub struct IntegrityResponse {
    /// `true` when every other list is empty.
    pub clean: bool,
    /// Index entries with no record.
    pub dangling: Vec<DanglingEntry>,
    /// Store keys holding records that no index lists.
    pub orphaned_records: Vec<String>,
    /// Players whose team back-reference does not match exactly one roster.
    pub mismatched_players: Vec<RecordId>,
    /// Roster entries naming unknown players.
    pub unknown_roster_entries: Vec<RosterEntry>,
    /// Game sides naming unknown teams.
    pub unknown_game_teams: Vec<GameTeamEntry>,
}

impl From<IntegrityReport> for IntegrityResponse {
    fn from(report: IntegrityReport) -> Self {
        Self {
            clean: report.is_clean(),
            dangling: report
                .dangling
                .into_iter()
                .map(|entry| DanglingEntry {
                    index: entry.collection.key().to_string(),
                    id: entry.id,
                })
                .collect(),
            orphaned_records: report.orphaned_records,
            mismatched_players: report.mismatched_players,
            unknown_roster_entries: report
                .unknown_roster_entries
                .into_iter()
                .map(|(team_id, player_id)| RosterEntry { team_id, player_id })
                .collect(),
            unknown_game_teams: report
                .unknown_game_teams
                .into_iter()
                .map(|(game_id, team_id)| GameTeamEntry { game_id, team_id })
                .collect(),
        }
    }
}
