//! Tournament records and the TournamentRegistry.

use serde::Serialize;

use crate::error::{ChessError, ChessResult};
use crate::map::OrderedMap;
use crate::models::game::{GameRegistry, ParticipantCursor};
use crate::models::player::{PlayerId, PlayerRegistry, UpdateMode};

/// Identifier for a tournament. Only positive values are valid.
pub type TournamentId = i32;

pub fn tournament_id_is_valid(id: TournamentId) -> bool {
    id > 0
}

/// One uppercase letter followed only by lowercase letters and spaces.
pub fn location_is_valid(location: &str) -> bool {
    let mut chars = location.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {
            chars.all(|c| c.is_ascii_lowercase() || c == ' ')
        }
        _ => false,
    }
}

/// A tournament: its settings, its games, a local mirror of its participants' stats,
/// and running aggregates.
#[derive(Clone, Debug)]
pub struct Tournament {
    location: String,
    max_games_per_player: u32,
    ended: bool,
    winner: Option<PlayerId>,
    games: GameRegistry,
    players: PlayerRegistry,
    game_count: u32,
    total_game_time: u64,
    longest_game_time: u32,
    /// Every player that ever played here, including ones removed since.
    participants: OrderedMap<PlayerId, ()>,
}

/// Read-only view of a tournament, for reports and snapshots.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TournamentSummary {
    pub location: String,
    pub max_games_per_player: u32,
    pub ended: bool,
    pub winner: Option<PlayerId>,
    pub game_count: u32,
    pub total_game_time: u64,
    pub longest_game_time: u32,
    pub average_game_time: f64,
    pub participant_count: u32,
}

impl Tournament {
    fn new(
        location: &str,
        max_games_per_player: u32,
        player_limit: Option<usize>,
        game_limit: Option<usize>,
    ) -> Self {
        Self {
            location: location.to_string(),
            max_games_per_player,
            ended: false,
            winner: None,
            games: GameRegistry::with_capacity_limit(game_limit),
            players: PlayerRegistry::with_capacity_limit(player_limit),
            game_count: 0,
            total_game_time: 0,
            longest_game_time: 0,
            participants: OrderedMap::new(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn max_games_per_player(&self) -> u32 {
        self.max_games_per_player
    }

    pub fn has_ended(&self) -> bool {
        self.ended
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn games(&self) -> &GameRegistry {
        &self.games
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    pub(crate) fn games_mut(&mut self) -> &mut GameRegistry {
        &mut self.games
    }

    pub(crate) fn players_mut(&mut self) -> &mut PlayerRegistry {
        &mut self.players
    }

    pub fn game_count(&self) -> u32 {
        self.game_count
    }

    pub fn total_game_time(&self) -> u64 {
        self.total_game_time
    }

    pub fn longest_game_time(&self) -> u32 {
        self.longest_game_time
    }

    /// Distinct players that ever played in this tournament.
    pub fn participant_count(&self) -> u32 {
        u32::try_from(self.participants.len()).unwrap_or(u32::MAX)
    }

    pub fn average_game_time(&self) -> f64 {
        if self.game_count == 0 {
            return 0.0;
        }
        self.total_game_time as f64 / f64::from(self.game_count)
    }

    /// Count a newly stored game in the tournament aggregates.
    pub(crate) fn record_game(&mut self, duration: u32) {
        self.game_count += 1;
        self.total_game_time += u64::from(duration);
        self.longest_game_time = self.longest_game_time.max(duration);
    }

    /// Remember that `player` played here. Returns true the first time.
    pub(crate) fn note_participant(&mut self, player: PlayerId) -> ChessResult<bool> {
        if self.participants.contains(&player) {
            return Ok(false);
        }
        self.participants.put_owned(player, ())?;
        Ok(true)
    }

    pub(crate) fn forget_participant(&mut self, player: PlayerId) {
        self.participants.remove(&player);
    }

    /// Close the tournament and pick its winner. Terminal: no more games may be added.
    pub(crate) fn end(&mut self, id: TournamentId) -> ChessResult<PlayerId> {
        if self.ended {
            return Err(ChessError::TournamentEnded(id));
        }
        if self.games.is_empty() {
            return Err(ChessError::NoGames(id));
        }
        let winner = self.players.winner().ok_or(ChessError::NoGames(id))?;
        self.ended = true;
        self.winner = Some(winner);
        Ok(winner)
    }

    /// Remove `player` from this tournament.
    ///
    /// In a running tournament every game of the player is deleted and counted as a win
    /// for the opponent, locally and in `global`. In an ended tournament the games stay as
    /// history and only the local stats entry is dropped. Returns whether the player took
    /// part at all.
    pub(crate) fn forfeit_player(
        &mut self,
        player: PlayerId,
        global: &mut PlayerRegistry,
    ) -> ChessResult<bool> {
        if !self.players.exists(player) {
            return Ok(false);
        }
        if !self.ended {
            let mut cursor = ParticipantCursor::new(player);
            while let Some(game) = cursor.next_removing(&mut self.games) {
                let previous = game.outcome.result_for_second();
                self.players.record_forfeit_win(game.opponent, previous)?;
                global.record_forfeit_win(game.opponent, previous)?;
            }
        }
        self.players.remove(player)?;
        Ok(true)
    }

    pub fn summary(&self) -> TournamentSummary {
        TournamentSummary {
            location: self.location.clone(),
            max_games_per_player: self.max_games_per_player,
            ended: self.ended,
            winner: self.winner,
            game_count: self.game_count,
            total_game_time: self.total_game_time,
            longest_game_time: self.longest_game_time,
            average_game_time: self.average_game_time(),
            participant_count: self.participant_count(),
        }
    }
}

/// All tournaments, keyed by id.
#[derive(Clone, Debug, Default)]
pub struct TournamentRegistry {
    tournaments: OrderedMap<TournamentId, Tournament>,
    player_limit: Option<usize>,
    game_limit: Option<usize>,
}

impl TournamentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with optional limits on tournaments, and on players and games per tournament.
    pub fn with_limits(
        tournament_limit: Option<usize>,
        player_limit: Option<usize>,
        game_limit: Option<usize>,
    ) -> Self {
        Self {
            tournaments: OrderedMap::with_capacity_limit(tournament_limit),
            player_limit,
            game_limit,
        }
    }

    /// Create an empty tournament. Checks run in order: id, location, max games, uniqueness.
    pub fn create(
        &mut self,
        id: TournamentId,
        location: &str,
        max_games_per_player: i32,
    ) -> ChessResult<()> {
        if !tournament_id_is_valid(id) {
            return Err(ChessError::InvalidId);
        }
        if !location_is_valid(location) {
            return Err(ChessError::InvalidLocation(location.to_string()));
        }
        let max_games = u32::try_from(max_games_per_player)
            .ok()
            .filter(|&max| max > 0)
            .ok_or(ChessError::InvalidMaxGames(max_games_per_player))?;
        if self.tournaments.contains(&id) {
            return Err(ChessError::TournamentAlreadyExists(id));
        }
        let tournament = Tournament::new(location, max_games, self.player_limit, self.game_limit);
        self.tournaments.put_owned(id, tournament)?;
        Ok(())
    }

    /// Remove a tournament, first taking its local stats back out of `global`.
    ///
    /// Global entries left with no games are evicted.
    pub fn remove(&mut self, id: TournamentId, global: &mut PlayerRegistry) -> ChessResult<()> {
        let tournament = self
            .tournaments
            .remove(&id)
            .ok_or(ChessError::TournamentNotFound(id))?;
        for (player, local) in tournament.players.iter() {
            if let Err(err) = global.accumulate(player, local, UpdateMode::Undo) {
                log::warn!(
                    "Tournament {}: player {} has local stats but no global entry: {}",
                    id,
                    player,
                    err
                );
                continue;
            }
            if global.get(player).is_some_and(|stats| stats.games == 0) {
                global.remove(player)?;
            }
        }
        Ok(())
    }

    /// Remove `player` from every tournament and from `global`.
    ///
    /// See [`Tournament::forfeit_player`] for what happens inside each tournament.
    pub fn remove_participant(
        &mut self,
        player: PlayerId,
        global: &mut PlayerRegistry,
    ) -> ChessResult<()> {
        for (&id, tournament) in self.tournaments.iter_mut() {
            if tournament.forfeit_player(player, global)? {
                log::debug!("Removed player {} from tournament {}", player, id);
            }
        }
        global.remove(player)?;
        Ok(())
    }

    /// End a tournament and return its winner.
    pub fn end(&mut self, id: TournamentId) -> ChessResult<PlayerId> {
        self.get_mut(id)?.end(id)
    }

    pub fn get(&self, id: TournamentId) -> ChessResult<&Tournament> {
        self.tournaments
            .get(&id)
            .ok_or(ChessError::TournamentNotFound(id))
    }

    pub fn get_mut(&mut self, id: TournamentId) -> ChessResult<&mut Tournament> {
        self.tournaments
            .get_mut(&id)
            .ok_or(ChessError::TournamentNotFound(id))
    }

    pub fn contains(&self, id: TournamentId) -> bool {
        self.tournaments.contains(&id)
    }

    /// False for tournaments that do not exist.
    pub fn has_ended(&self, id: TournamentId) -> bool {
        self.tournaments.get(&id).is_some_and(Tournament::has_ended)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TournamentId, &Tournament)> + '_ {
        self.tournaments.iter().map(|(&id, t)| (id, t))
    }

    pub fn len(&self) -> usize {
        self.tournaments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tournaments.is_empty()
    }
}
