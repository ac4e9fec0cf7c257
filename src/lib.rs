//! Chess tournament records: an in-memory store of tournaments, their games and
//! per-player statistics, kept consistent across every registry.

pub mod config;
pub mod error;
pub mod logic;
pub mod map;
pub mod models;
pub mod system;

pub use config::SystemConfig;
pub use error::{ChessError, ChessResult, MapError};
pub use map::OrderedMap;
pub use models::{
    GameKey, GameOutcome, GameRecord, GameRegistry, ParticipantGame, PlayerId, PlayerRegistry,
    PlayerResult, PlayerStats, Tournament, TournamentId, TournamentRegistry, TournamentSummary,
    UpdateMode,
};
pub use system::{ChessSystem, SystemSnapshot, TournamentSnapshot};
