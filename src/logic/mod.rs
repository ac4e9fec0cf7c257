//! Operations that span more than one registry: adding games, ending tournaments, reports.

mod games;
mod reports;
mod standings;

pub use games::add_game;
pub use reports::{save_tournament_statistics, write_player_levels, write_tournament_statistics};
pub use standings::{end_tournament, ranked_levels};
