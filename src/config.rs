//! Capacity limits for a chess system.
//!
//! Override with env: CHESS_MAX_PLAYERS, CHESS_MAX_TOURNAMENTS,
//! CHESS_MAX_PLAYERS_PER_TOURNAMENT, CHESS_MAX_GAMES_PER_TOURNAMENT.

use serde::{Deserialize, Serialize};

/// Storage limits. `None` means unbounded. Going past a limit is reported as an
/// allocation failure by the operation that needed the extra entry.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Players in the global registry.
    pub max_players: Option<usize>,
    pub max_tournaments: Option<usize>,
    /// Players in each tournament-local registry.
    pub max_players_per_tournament: Option<usize>,
    pub max_games_per_tournament: Option<usize>,
}

impl SystemConfig {
    /// Defaults overridden by whichever env variables are set and parse as a number.
    pub fn from_env() -> Self {
        Self {
            max_players: env_limit("CHESS_MAX_PLAYERS"),
            max_tournaments: env_limit("CHESS_MAX_TOURNAMENTS"),
            max_players_per_tournament: env_limit("CHESS_MAX_PLAYERS_PER_TOURNAMENT"),
            max_games_per_tournament: env_limit("CHESS_MAX_GAMES_PER_TOURNAMENT"),
        }
    }
}

fn env_limit(name: &str) -> Option<usize> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
