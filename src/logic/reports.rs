//! Text reports: player levels and statistics of ended tournaments.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{ChessError, ChessResult};
use crate::logic::standings::ranked_levels;
use crate::models::{PlayerRegistry, TournamentRegistry};

/// One line per player with games: `"<id> <level>"`, level with two decimals, best first.
pub fn write_player_levels<W: Write>(players: &PlayerRegistry, out: &mut W) -> ChessResult<()> {
    let ranking = ranked_levels(players)?;
    for (id, level) in &ranking {
        writeln!(out, "{} {:.2}", id, level)?;
    }
    out.flush()?;
    log::info!("Wrote levels of {} player(s)", ranking.len());
    Ok(())
}

/// Six lines per ended tournament, in id order: winner, longest game, average game time
/// (two decimals), location, number of games, number of participants.
pub fn write_tournament_statistics<W: Write>(
    tournaments: &TournamentRegistry,
    out: &mut W,
) -> ChessResult<()> {
    let ended: Vec<_> = tournaments
        .iter()
        .filter(|(_, t)| t.has_ended())
        .map(|(_, t)| t)
        .collect();
    if ended.is_empty() {
        return Err(ChessError::NoTournamentsEnded);
    }
    for t in &ended {
        writeln!(out, "{}", t.winner().unwrap_or_default())?;
        writeln!(out, "{}", t.longest_game_time())?;
        writeln!(out, "{:.2}", t.average_game_time())?;
        writeln!(out, "{}", t.location())?;
        writeln!(out, "{}", t.game_count())?;
        writeln!(out, "{}", t.participant_count())?;
    }
    out.flush()?;
    log::info!("Wrote statistics of {} ended tournament(s)", ended.len());
    Ok(())
}

/// [`write_tournament_statistics`] into a file at `path`. The file is only created when at
/// least one tournament has ended.
pub fn save_tournament_statistics(
    tournaments: &TournamentRegistry,
    path: &Path,
) -> ChessResult<()> {
    if !tournaments.iter().any(|(_, t)| t.has_ended()) {
        return Err(ChessError::NoTournamentsEnded);
    }
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write_tournament_statistics(tournaments, &mut out)?;
    log::info!("Saved tournament statistics to {}", path.display());
    Ok(())
}
