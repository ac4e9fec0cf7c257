//! ChessSystem: the facade owning every tournament and the global player registry.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::config::SystemConfig;
use crate::error::{ChessError, ChessResult};
use crate::logic;
use crate::models::{
    player_id_is_valid, tournament_id_is_valid, GameKey, GameOutcome, GameRecord, PlayerId,
    PlayerRegistry, PlayerStats, Tournament, TournamentId, TournamentRegistry, TournamentSummary,
};

/// In-memory record of tournaments, their games and per-player statistics.
///
/// A player's global stats always equal the sum of that player's stats over every
/// tournament they appear in.
#[derive(Clone, Debug, Default)]
pub struct ChessSystem {
    tournaments: TournamentRegistry,
    players: PlayerRegistry,
    config: SystemConfig,
}

/// Full state of one tournament, ordered by key.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TournamentSnapshot {
    pub id: TournamentId,
    pub summary: TournamentSummary,
    pub players: Vec<(PlayerId, PlayerStats)>,
    pub games: Vec<(GameKey, GameRecord)>,
}

/// Full state of a system, for comparisons and dumps.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SystemSnapshot {
    pub players: Vec<(PlayerId, PlayerStats)>,
    pub tournaments: Vec<TournamentSnapshot>,
}

impl ChessSystem {
    /// Create an empty, unbounded system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty system with the given storage limits.
    pub fn with_config(config: SystemConfig) -> Self {
        Self {
            tournaments: TournamentRegistry::with_limits(
                config.max_tournaments,
                config.max_players_per_tournament,
                config.max_games_per_tournament,
            ),
            players: PlayerRegistry::with_capacity_limit(config.max_players),
            config,
        }
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn add_tournament(
        &mut self,
        tournament_id: TournamentId,
        max_games_per_player: i32,
        location: &str,
    ) -> ChessResult<()> {
        self.tournaments
            .create(tournament_id, location, max_games_per_player)?;
        log::debug!("Tournament {} created in {}", tournament_id, location);
        Ok(())
    }

    /// See [`logic::add_game`].
    pub fn add_game(
        &mut self,
        tournament_id: TournamentId,
        first_player: PlayerId,
        second_player: PlayerId,
        outcome: GameOutcome,
        play_time: i32,
    ) -> ChessResult<()> {
        logic::add_game(
            &mut self.tournaments,
            &mut self.players,
            tournament_id,
            first_player,
            second_player,
            outcome,
            play_time,
        )
    }

    /// Remove a tournament with all its games, taking its games out of the global stats.
    pub fn remove_tournament(&mut self, tournament_id: TournamentId) -> ChessResult<()> {
        if !tournament_id_is_valid(tournament_id) {
            return Err(ChessError::InvalidId);
        }
        self.tournaments.remove(tournament_id, &mut self.players)?;
        log::debug!("Tournament {} removed", tournament_id);
        Ok(())
    }

    /// Remove a player. Each game the player has in a running tournament is deleted and
    /// counted as a win for the opponent.
    pub fn remove_player(&mut self, player_id: PlayerId) -> ChessResult<()> {
        if !player_id_is_valid(player_id) {
            return Err(ChessError::InvalidId);
        }
        if !self.players.exists(player_id) {
            return Err(ChessError::PlayerNotFound(player_id));
        }
        self.tournaments
            .remove_participant(player_id, &mut self.players)?;
        log::debug!("Player {} removed", player_id);
        Ok(())
    }

    /// End a tournament and return its winner.
    pub fn end_tournament(&mut self, tournament_id: TournamentId) -> ChessResult<PlayerId> {
        logic::end_tournament(&mut self.tournaments, tournament_id)
    }

    /// Average duration of the player's games across all tournaments.
    pub fn average_play_time(&self, player_id: PlayerId) -> ChessResult<f64> {
        Ok(self.player_stats(player_id)?.average_play_time())
    }

    pub fn player_stats(&self, player_id: PlayerId) -> ChessResult<&PlayerStats> {
        if !player_id_is_valid(player_id) {
            return Err(ChessError::InvalidId);
        }
        self.players
            .get(player_id)
            .ok_or(ChessError::PlayerNotFound(player_id))
    }

    pub fn player_level(&self, player_id: PlayerId) -> ChessResult<f64> {
        Ok(self.player_stats(player_id)?.level())
    }

    pub fn tournament(&self, tournament_id: TournamentId) -> ChessResult<&Tournament> {
        if !tournament_id_is_valid(tournament_id) {
            return Err(ChessError::InvalidId);
        }
        self.tournaments.get(tournament_id)
    }

    /// Winner of an ended tournament; `None` while it is still running.
    pub fn tournament_winner(
        &self,
        tournament_id: TournamentId,
    ) -> ChessResult<Option<PlayerId>> {
        Ok(self.tournament(tournament_id)?.winner())
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    pub fn tournaments(&self) -> &TournamentRegistry {
        &self.tournaments
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn tournament_count(&self) -> usize {
        self.tournaments.len()
    }

    /// Write `"<id> <level>"` lines for every player with games, highest level first.
    pub fn save_player_levels<W: Write>(&self, out: &mut W) -> ChessResult<()> {
        logic::write_player_levels(&self.players, out)
    }

    /// Write the statistics of every ended tournament to the file at `path`.
    pub fn save_tournament_statistics(&self, path: impl AsRef<Path>) -> ChessResult<()> {
        logic::save_tournament_statistics(&self.tournaments, path.as_ref())
    }

    /// Same report as [`ChessSystem::save_tournament_statistics`], into any writer.
    pub fn write_tournament_statistics<W: Write>(&self, out: &mut W) -> ChessResult<()> {
        logic::write_tournament_statistics(&self.tournaments, out)
    }

    pub fn snapshot(&self) -> SystemSnapshot {
        SystemSnapshot {
            players: self.players.iter().map(|(id, s)| (id, *s)).collect(),
            tournaments: self
                .tournaments
                .iter()
                .map(|(id, t)| TournamentSnapshot {
                    id,
                    summary: t.summary(),
                    players: t.players().iter().map(|(p, s)| (p, *s)).collect(),
                    games: t.games().iter().map(|(k, g)| (*k, *g)).collect(),
                })
                .collect(),
        }
    }
}
