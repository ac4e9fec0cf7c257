//! Data structures for the chess system: players, games, tournaments and their registries.

mod game;
mod player;
mod tournament;

pub use game::{
    Duel, GameKey, GameOutcome, GameRecord, GameRegistry, ParticipantCursor, ParticipantGame,
    ParticipantGames,
};
pub use player::{
    player_id_is_valid, PlayerId, PlayerRegistry, PlayerResult, PlayerStats, UpdateMode,
};
pub use tournament::{
    location_is_valid, tournament_id_is_valid, Tournament, TournamentId, TournamentRegistry,
    TournamentSummary,
};
