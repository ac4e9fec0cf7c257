//! Ending tournaments and ranking players by level.

use crate::error::{ChessError, ChessResult};
use crate::models::{
    tournament_id_is_valid, PlayerId, PlayerRegistry, TournamentId, TournamentRegistry,
};

/// End a running tournament that has at least one game, and return its winner.
pub fn end_tournament(
    tournaments: &mut TournamentRegistry,
    tournament_id: TournamentId,
) -> ChessResult<PlayerId> {
    if !tournament_id_is_valid(tournament_id) {
        return Err(ChessError::InvalidId);
    }
    let winner = tournaments.end(tournament_id)?;
    log::debug!("Tournament {} ended, winner {}", tournament_id, winner);
    Ok(winner)
}

/// Players that have played at least one game, highest level first (ties: smaller id first).
///
/// Works on a copy of `players`, extracting the best remaining player until none is left.
pub fn ranked_levels(players: &PlayerRegistry) -> ChessResult<Vec<(PlayerId, f64)>> {
    let mut remaining = players.try_copy()?;
    let mut ranking = Vec::with_capacity(players.len());
    while let Some((id, level)) = remaining.max_level_and_remove(true) {
        if players.get(id).is_some_and(|stats| stats.games > 0) {
            ranking.push((id, level));
        }
    }
    Ok(ranking)
}
