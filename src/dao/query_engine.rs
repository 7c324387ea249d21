//! Façade over the key-value store emulating typed collections.
//!
//! Layout inside the store:
//! - `counter`: last identifier handed out, shared by every record kind
//! - `team_list`, `game_list`, `player_list`: JSON arrays of identifiers
//! - `"<id>"`: the JSON-encoded record for that identifier
//!
//! Inserts write the record before the index entry and deletes drop the index
//! entry before the record, so an interrupted mutation leaves at worst an
//! orphaned record or a dangling index entry. [`QueryEngine::check_integrity`]
//! reports both.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, OnceLock},
};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::dao::{
    kv_store::KeyValueStore,
    models::{ActionEntity, GameEntity, PlayerEntity, RecordId, TeamEntity},
    storage::StorageError,
};

const COUNTER_KEY: &str = "counter";

static INSTANCE: OnceLock<Arc<QueryEngine>> = OnceLock::new();

/// Result alias for query engine operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors surfaced by [`QueryEngine`] operations.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The underlying key-value store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// A stored value did not match the expected JSON shape.
    #[error("failed to decode value stored under `{key}`")]
    Decode {
        /// Store key holding the undecodable value.
        key: String,
        /// Parse failure reported by serde.
        #[source]
        source: serde_json::Error,
    },
    /// A value could not be serialized before writing.
    #[error("failed to encode value for `{key}`")]
    Encode {
        /// Store key the value was destined for.
        key: String,
        /// Serialization failure reported by serde.
        #[source]
        source: serde_json::Error,
    },
    /// No record of that kind is indexed under the identifier.
    #[error("{kind} `{id}` not found")]
    NotFound {
        /// Record kind (`team`, `game`, or `player`).
        kind: &'static str,
        /// Identifier that was looked up.
        id: RecordId,
    },
    /// The game no longer accepts actions.
    #[error("game `{0}` is already finished")]
    GameFinished(RecordId),
    /// The shared counter reached the largest representable identifier.
    #[error("identifier counter exhausted")]
    CounterExhausted,
    /// [`QueryEngine::instance`] was called before [`QueryEngine::init`].
    #[error("query engine used before QueryEngine::init")]
    NotInitialized,
}

/// One of the three ID index lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// `team_list`
    Teams,
    /// `game_list`
    Games,
    /// `player_list`
    Players,
}

impl Collection {
    /// Every index list, in the order integrity checks visit them.
    pub const ALL: [Collection; 3] = [Collection::Teams, Collection::Games, Collection::Players];

    /// Store key holding this index list.
    pub fn key(self) -> &'static str {
        match self {
            Collection::Teams => "team_list",
            Collection::Games => "game_list",
            Collection::Players => "player_list",
        }
    }

    fn kind(self) -> &'static str {
        match self {
            Collection::Teams => "team",
            Collection::Games => "game",
            Collection::Players => "player",
        }
    }
}

/// Index entry whose record is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingId {
    /// Index list holding the entry.
    pub collection: Collection,
    /// Identifier with no record behind it.
    pub id: RecordId,
}

/// Result of [`QueryEngine::check_integrity`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    /// Index entries with no stored record.
    pub dangling: Vec<DanglingId>,
    /// Numeric keys holding a record that no index references, sorted.
    ///
    /// Non-canonical spellings such as `007` or `+7` always count: records
    /// are only ever stored under the plain decimal form of their identifier.
    pub orphaned_records: Vec<String>,
    /// Players whose team back-reference does not match exactly one roster.
    pub mismatched_players: Vec<RecordId>,
    /// `(team, player)` roster entries naming an unknown player.
    pub unknown_roster_entries: Vec<(RecordId, RecordId)>,
    /// `(game, team)` side assignments naming a team that is not indexed.
    pub unknown_game_teams: Vec<(RecordId, RecordId)>,
}

impl IntegrityReport {
    /// `true` when no inconsistency was found.
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty()
            && self.orphaned_records.is_empty()
            && self.mismatched_players.is_empty()
            && self.unknown_roster_entries.is_empty()
            && self.unknown_game_teams.is_empty()
    }
}

/// Single access point for reads and writes against the key-value store.
///
/// Mutations are serialized through one async gate so the counter and index
/// read-modify-write cycles never interleave within the process. Typed lookups
/// consult the matching index first: an identifier that belongs to another
/// record kind reads as absent.
pub struct QueryEngine {
    store: Arc<dyn KeyValueStore>,
    write_gate: Mutex<()>,
}

fn install(slot: &OnceLock<Arc<QueryEngine>>, store: Arc<dyn KeyValueStore>) -> Arc<QueryEngine> {
    slot.get_or_init(|| {
        info!("query engine initialised");
        Arc::new(QueryEngine::new(store))
    })
    .clone()
}

fn installed(slot: &OnceLock<Arc<QueryEngine>>) -> QueryResult<Arc<QueryEngine>> {
    slot.get().cloned().ok_or(QueryError::NotInitialized)
}

impl QueryEngine {
    /// Build an engine over `store` without touching the process-wide instance.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_gate: Mutex::new(()),
        }
    }

    /// Install the process-wide engine. Later calls keep and return the first instance.
    pub fn init(store: Arc<dyn KeyValueStore>) -> Arc<QueryEngine> {
        install(&INSTANCE, store)
    }

    /// Fetch the engine installed by [`QueryEngine::init`].
    pub fn instance() -> QueryResult<Arc<QueryEngine>> {
        installed(&INSTANCE)
    }

    /// Probe the backing store.
    pub async fn health_check(&self) -> QueryResult<()> {
        self.store.health_check().await.map_err(Into::into)
    }

    // -----------------------------------------------------------------------
    // Store primitives
    // -----------------------------------------------------------------------

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> QueryResult<Option<T>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| QueryError::Decode {
                key: key.to_string(),
                source,
            })
    }

    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> QueryResult<()> {
        let raw = serde_json::to_string(value).map_err(|source| QueryError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.put(key, raw).await.map_err(Into::into)
    }

    /// Hand out the next identifier. Callers must hold the write gate.
    async fn next_id(&self) -> QueryResult<RecordId> {
        let current: RecordId = self.read_json(COUNTER_KEY).await?.unwrap_or(0);
        let next = current.checked_add(1).ok_or(QueryError::CounterExhausted)?;
        self.write_json(COUNTER_KEY, &next).await?;
        Ok(next)
    }

    async fn ids(&self, collection: Collection) -> QueryResult<Vec<RecordId>> {
        Ok(self.read_json(collection.key()).await?.unwrap_or_default())
    }

    async fn set_ids(&self, collection: Collection, ids: &[RecordId]) -> QueryResult<()> {
        self.write_json(collection.key(), ids).await
    }

    async fn add_id(&self, collection: Collection, id: RecordId) -> QueryResult<()> {
        let mut ids = self.ids(collection).await?;
        ids.push(id);
        self.set_ids(collection, &ids).await
    }

    /// Remove the first occurrence of `id`; returns whether it was listed.
    async fn remove_id(&self, collection: Collection, id: RecordId) -> QueryResult<bool> {
        let mut ids = self.ids(collection).await?;
        let Some(index) = ids.iter().position(|candidate| *candidate == id) else {
            return Ok(false);
        };
        ids.remove(index);
        self.set_ids(collection, &ids).await?;
        Ok(true)
    }

    async fn contains_id(&self, collection: Collection, id: RecordId) -> QueryResult<bool> {
        Ok(self.ids(collection).await?.contains(&id))
    }

    async fn record<T: DeserializeOwned>(&self, id: RecordId) -> QueryResult<Option<T>> {
        self.read_json(&id.to_string()).await
    }

    async fn put_record<T: Serialize>(&self, id: RecordId, record: &T) -> QueryResult<()> {
        self.write_json(&id.to_string(), record).await
    }

    async fn remove_record(&self, id: RecordId) -> QueryResult<()> {
        self.store
            .remove(&id.to_string())
            .await
            .map_err(Into::into)
    }

    /// Record lookup restricted to identifiers listed in `collection`.
    async fn typed_record<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: RecordId,
    ) -> QueryResult<Option<T>> {
        if !self.contains_id(collection, id).await? {
            return Ok(None);
        }
        self.record(id).await
    }

    async fn require<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: RecordId,
    ) -> QueryResult<T> {
        self.typed_record(collection, id)
            .await?
            .ok_or(QueryError::NotFound {
                kind: collection.kind(),
                id,
            })
    }

    async fn insert<T: Serialize>(
        &self,
        collection: Collection,
        record: &T,
    ) -> QueryResult<RecordId> {
        let id = self.next_id().await?;
        self.put_record(id, record).await?;
        self.add_id(collection, id).await?;
        debug!(id, collection = collection.key(), "inserted record");
        Ok(id)
    }

    async fn replace<T: Serialize>(
        &self,
        collection: Collection,
        id: RecordId,
        record: &T,
    ) -> QueryResult<()> {
        if !self.contains_id(collection, id).await? {
            return Err(QueryError::NotFound {
                kind: collection.kind(),
                id,
            });
        }
        self.put_record(id, record).await
    }

    async fn delete(&self, collection: Collection, id: RecordId) -> QueryResult<bool> {
        let listed = self.remove_id(collection, id).await?;
        if listed {
            self.remove_record(id).await?;
            debug!(id, collection = collection.key(), "removed record");
        }
        Ok(listed)
    }

    /// Resolve every listed identifier, skipping those with no record.
    async fn scan<T: DeserializeOwned>(
        &self,
        collection: Collection,
        ids: Vec<RecordId>,
    ) -> QueryResult<Vec<(RecordId, T)>> {
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            match self.record(id).await? {
                Some(record) => records.push((id, record)),
                None => warn!(
                    id,
                    collection = collection.key(),
                    "index references missing record"
                ),
            }
        }
        Ok(records)
    }

    // -----------------------------------------------------------------------
    // Teams
    // -----------------------------------------------------------------------

    /// Identifiers listed in `team_list`.
    pub async fn team_ids(&self) -> QueryResult<Vec<RecordId>> {
        self.ids(Collection::Teams).await
    }

    /// Teams in index order.
    pub async fn teams(&self) -> QueryResult<Vec<(RecordId, TeamEntity)>> {
        let ids = self.team_ids().await?;
        self.scan(Collection::Teams, ids).await
    }

    /// Allocate an identifier and store `team` under it.
    pub async fn add_team(&self, team: TeamEntity) -> QueryResult<RecordId> {
        let _gate = self.write_gate.lock().await;
        self.insert(Collection::Teams, &team).await
    }

    /// Team record, if `team_id` is listed in `team_list`.
    pub async fn team(&self, team_id: RecordId) -> QueryResult<Option<TeamEntity>> {
        self.typed_record(Collection::Teams, team_id).await
    }

    /// Replace a team record. The roster is kept as stored; it only changes
    /// through [`QueryEngine::add_player`] and [`QueryEngine::remove_player`].
    pub async fn set_team(&self, team_id: RecordId, mut team: TeamEntity) -> QueryResult<()> {
        let _gate = self.write_gate.lock().await;
        let current: TeamEntity = self.require(Collection::Teams, team_id).await?;
        team.players = current.players;
        self.put_record(team_id, &team).await
    }

    /// Change a team's name, returning the stored record.
    pub async fn rename_team(
        &self,
        team_id: RecordId,
        name: impl Into<String>,
    ) -> QueryResult<TeamEntity> {
        let _gate = self.write_gate.lock().await;
        let mut team: TeamEntity = self.require(Collection::Teams, team_id).await?;
        team.name = name.into();
        self.put_record(team_id, &team).await?;
        Ok(team)
    }

    /// Remove a team together with the players on its roster. Games that
    /// referenced the team keep their scoresheet with that side unassigned.
    pub async fn remove_team(&self, team_id: RecordId) -> QueryResult<bool> {
        let _gate = self.write_gate.lock().await;
        let team: Option<TeamEntity> = self.typed_record(Collection::Teams, team_id).await?;
        let removed = self.delete(Collection::Teams, team_id).await?;

        if let Some(team) = team {
            for player_id in team.players {
                self.delete(Collection::Players, player_id).await?;
            }
        }

        let ids = self.ids(Collection::Games).await?;
        for (game_id, mut game) in self.scan::<GameEntity>(Collection::Games, ids).await? {
            if game.unassign_team(team_id) {
                self.put_record(game_id, &game).await?;
                debug!(game_id, team_id, "unassigned removed team from game");
            }
        }
        Ok(removed)
    }

    // -----------------------------------------------------------------------
    // Games
    // -----------------------------------------------------------------------

    /// Identifiers listed in `game_list`.
    pub async fn game_ids(&self) -> QueryResult<Vec<RecordId>> {
        self.ids(Collection::Games).await
    }

    /// Games in index order.
    pub async fn games(&self) -> QueryResult<Vec<(RecordId, GameEntity)>> {
        let ids = self.game_ids().await?;
        self.scan(Collection::Games, ids).await
    }

    /// Identifiers of games still in progress.
    pub async fn active_game_ids(&self) -> QueryResult<Vec<RecordId>> {
        Ok(self
            .active_games()
            .await?
            .into_iter()
            .map(|(id, _)| id)
            .collect())
    }

    /// Games still in progress, in index order.
    pub async fn active_games(&self) -> QueryResult<Vec<(RecordId, GameEntity)>> {
        let mut games = self.games().await?;
        games.retain(|(_, game)| game.is_active());
        Ok(games)
    }

    /// Allocate an identifier and store `game` under it.
    ///
    /// Fails with [`QueryError::NotFound`] when a side names a team that is not
    /// indexed; nothing is allocated in that case.
    pub async fn add_game(&self, game: GameEntity) -> QueryResult<RecordId> {
        let _gate = self.write_gate.lock().await;
        for team_id in [game.home_team_id, game.away_team_id].into_iter().flatten() {
            if !self.contains_id(Collection::Teams, team_id).await? {
                return Err(QueryError::NotFound {
                    kind: Collection::Teams.kind(),
                    id: team_id,
                });
            }
        }
        self.insert(Collection::Games, &game).await
    }

    /// Game record, if `game_id` is listed in `game_list`.
    pub async fn game(&self, game_id: RecordId) -> QueryResult<Option<GameEntity>> {
        self.typed_record(Collection::Games, game_id).await
    }

    /// Replace a game record wholesale.
    pub async fn set_game(&self, game_id: RecordId, game: GameEntity) -> QueryResult<()> {
        let _gate = self.write_gate.lock().await;
        self.replace(Collection::Games, game_id, &game).await
    }

    /// Drop a game's index entry and record; `false` when it was not listed.
    pub async fn remove_game(&self, game_id: RecordId) -> QueryResult<bool> {
        let _gate = self.write_gate.lock().await;
        self.delete(Collection::Games, game_id).await
    }

    /// Append `action` to the home side of an active game.
    pub async fn add_home_action(
        &self,
        game_id: RecordId,
        action: ActionEntity,
    ) -> QueryResult<GameEntity> {
        self.update_active_game(game_id, |game| game.add_home_action(action))
            .await
    }

    /// Append `action` to the away side of an active game.
    pub async fn add_away_action(
        &self,
        game_id: RecordId,
        action: ActionEntity,
    ) -> QueryResult<GameEntity> {
        self.update_active_game(game_id, |game| game.add_away_action(action))
            .await
    }

    /// Mark a game as finished. Finishing twice is a no-op.
    pub async fn finish_game(&self, game_id: RecordId) -> QueryResult<GameEntity> {
        let _gate = self.write_gate.lock().await;
        let mut game: GameEntity = self.require(Collection::Games, game_id).await?;
        if game.active {
            game.active = false;
            self.put_record(game_id, &game).await?;
            info!(game_id, "game finished");
        }
        Ok(game)
    }

    async fn update_active_game<F>(&self, game_id: RecordId, apply: F) -> QueryResult<GameEntity>
    where
        F: FnOnce(&mut GameEntity),
    {
        let _gate = self.write_gate.lock().await;
        let mut game: GameEntity = self.require(Collection::Games, game_id).await?;
        if !game.is_active() {
            return Err(QueryError::GameFinished(game_id));
        }
        apply(&mut game);
        self.put_record(game_id, &game).await?;
        Ok(game)
    }

    // -----------------------------------------------------------------------
    // Players
    // -----------------------------------------------------------------------

    /// Identifiers listed in `player_list`.
    pub async fn player_ids(&self) -> QueryResult<Vec<RecordId>> {
        self.ids(Collection::Players).await
    }

    /// Players of a team in roster order.
    pub async fn players(&self, team_id: RecordId) -> QueryResult<Vec<(RecordId, PlayerEntity)>> {
        let team: TeamEntity = self.require(Collection::Teams, team_id).await?;
        self.scan(Collection::Players, team.players).await
    }

    /// Register `player` on `team_id`, setting its back-reference.
    pub async fn add_player(
        &self,
        team_id: RecordId,
        mut player: PlayerEntity,
    ) -> QueryResult<RecordId> {
        let _gate = self.write_gate.lock().await;
        let mut team: TeamEntity = self.require(Collection::Teams, team_id).await?;

        player.team_id = Some(team_id);
        let player_id = self.insert(Collection::Players, &player).await?;

        team.add_player(player_id);
        self.put_record(team_id, &team).await?;

        Ok(player_id)
    }

    /// Player record, if `player_id` is listed in `player_list`.
    pub async fn player(&self, player_id: RecordId) -> QueryResult<Option<PlayerEntity>> {
        self.typed_record(Collection::Players, player_id).await
    }

    /// Replace a player record. The team back-reference is kept as stored.
    pub async fn set_player(
        &self,
        player_id: RecordId,
        mut player: PlayerEntity,
    ) -> QueryResult<()> {
        let _gate = self.write_gate.lock().await;
        let current: PlayerEntity = self.require(Collection::Players, player_id).await?;
        player.team_id = current.team_id;
        self.put_record(player_id, &player).await
    }

    /// Delete a player and detach it from its team's roster.
    pub async fn remove_player(&self, player_id: RecordId) -> QueryResult<bool> {
        let _gate = self.write_gate.lock().await;
        let player: Option<PlayerEntity> =
            self.typed_record(Collection::Players, player_id).await?;
        let removed = self.delete(Collection::Players, player_id).await?;

        if let Some(team_id) = player.and_then(|p| p.team_id) {
            if let Some(mut team) = self
                .typed_record::<TeamEntity>(Collection::Teams, team_id)
                .await?
            {
                if team.remove_player(player_id) {
                    self.put_record(team_id, &team).await?;
                }
            }
        }
        Ok(removed)
    }

    // -----------------------------------------------------------------------
    // Integrity
    // -----------------------------------------------------------------------

    /// Cross-check indices, records, and roster back-references.
    pub async fn check_integrity(&self) -> QueryResult<IntegrityReport> {
        let _gate = self.write_gate.lock().await;
        let mut report = IntegrityReport::default();

        let mut indexed = HashSet::new();
        let mut listed: HashMap<Collection, Vec<RecordId>> = HashMap::new();
        for collection in Collection::ALL {
            let ids = self.ids(collection).await?;
            for id in &ids {
                indexed.insert(*id);
                if self.store.get(&id.to_string()).await?.is_none() {
                    report.dangling.push(DanglingId {
                        collection,
                        id: *id,
                    });
                }
            }
            listed.insert(collection, ids);
        }

        let mut orphaned: Vec<String> = self
            .store
            .keys()
            .await?
            .into_iter()
            .filter(|key| match key.parse::<RecordId>() {
                Ok(id) => id.to_string() != *key || !indexed.contains(&id),
                Err(_) => false,
            })
            .collect();
        orphaned.sort_unstable();
        report.orphaned_records = orphaned;

        let player_ids = listed.remove(&Collection::Players).unwrap_or_default();
        let known_players: HashSet<RecordId> = player_ids.iter().copied().collect();
        let team_ids = listed.remove(&Collection::Teams).unwrap_or_default();
        let known_teams: HashSet<RecordId> = team_ids.iter().copied().collect();
        let game_ids = listed.remove(&Collection::Games).unwrap_or_default();

        for (game_id, game) in self.scan::<GameEntity>(Collection::Games, game_ids).await? {
            for team_id in [game.home_team_id, game.away_team_id].into_iter().flatten() {
                if !known_teams.contains(&team_id) {
                    report.unknown_game_teams.push((game_id, team_id));
                }
            }
        }

        let mut rosters: HashMap<RecordId, Vec<RecordId>> = HashMap::new();
        for (team_id, team) in self.scan::<TeamEntity>(Collection::Teams, team_ids).await? {
            for player_id in team.players {
                if known_players.contains(&player_id) {
                    rosters.entry(player_id).or_default().push(team_id);
                } else {
                    report.unknown_roster_entries.push((team_id, player_id));
                }
            }
        }

        for (player_id, player) in self
            .scan::<PlayerEntity>(Collection::Players, player_ids)
            .await?
        {
            let listing = rosters.get(&player_id).map(Vec::as_slice).unwrap_or(&[]);
            let consistent = match (player.team_id, listing) {
                (Some(team_id), [only]) => team_id == *only,
                _ => false,
            };
            if !consistent {
                report.mismatched_players.push(player_id);
            }
        }

        if !report.is_clean() {
            warn!(?report, "store integrity check found inconsistencies");
        }
        Ok(report)
    }
}
