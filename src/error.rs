//! Error types shared by the map, the registries and the system facade.

use thiserror::Error;

use crate::models::{PlayerId, TournamentId};

/// The only way an `OrderedMap` operation can fail.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum MapError {
    /// The backing storage could not grow, or the map is at its configured capacity.
    #[error("Allocation failure")]
    AllocationFailure,
}

/// Errors returned by chess system operations.
#[derive(Debug, Error)]
pub enum ChessError {
    /// Non-positive id, or both players of a game share the same id.
    #[error("Invalid id")]
    InvalidId,

    /// No tournament with this id.
    #[error("Tournament not found: {0}")]
    TournamentNotFound(TournamentId),

    /// No player with this id in the registry that was asked.
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    /// A tournament with this id was already created.
    #[error("Tournament already exists: {0}")]
    TournamentAlreadyExists(TournamentId),

    /// The two players already played each other in this tournament (ids smallest first).
    #[error("Game between {first} and {second} already exists")]
    GameAlreadyExists { first: PlayerId, second: PlayerId },

    /// Location must be one uppercase letter followed by lowercase letters and spaces.
    #[error("Invalid location: {0:?}")]
    InvalidLocation(String),

    /// Max games per player must be positive.
    #[error("Invalid max games per player: {0}")]
    InvalidMaxGames(i32),

    /// Game duration is negative.
    #[error("Invalid play time: {0}")]
    InvalidPlayTime(i32),

    /// A player already played the maximum number of games in this tournament.
    #[error("Player {0} exceeded the maximum number of games")]
    ExceededGames(PlayerId),

    /// The tournament is closed; no games may be added and it cannot end again.
    #[error("Tournament {0} already ended")]
    TournamentEnded(TournamentId),

    /// A tournament cannot end without at least one game.
    #[error("Tournament {0} has no games")]
    NoGames(TournamentId),

    /// Statistics were requested but no tournament has ended yet.
    #[error("No tournament has ended")]
    NoTournamentsEnded,

    /// Storage could not grow, or a configured capacity was reached.
    #[error("Allocation failure")]
    AllocationFailure(#[from] MapError),

    /// Writing a report failed.
    #[error("Save failure: {0}")]
    SaveFailure(#[from] std::io::Error),
}

/// Result type for chess system operations.
pub type ChessResult<T> = Result<T, ChessError>;
