//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use chess_tournament::{ChessSystem, PlayerId, PlayerStats, SystemConfig, UpdateMode};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// System with the given tournaments, each allowing 10 games per player.
pub fn system_with_tournaments(ids: &[i32]) -> ChessSystem {
    init_logging();
    let mut system = ChessSystem::new();
    for &id in ids {
        system.add_tournament(id, 10, "Haifa").unwrap();
    }
    system
}

pub fn limited_system(config: SystemConfig, ids: &[i32]) -> ChessSystem {
    init_logging();
    let mut system = ChessSystem::with_config(config);
    for &id in ids {
        system.add_tournament(id, 10, "Haifa").unwrap();
    }
    system
}

pub fn stats(system: &ChessSystem, id: PlayerId) -> PlayerStats {
    *system.player_stats(id).unwrap()
}

/// Every player's global stats equal the sum of its tournament-local stats, and
/// `games == wins + losses + draws` everywhere.
pub fn assert_consistent(system: &ChessSystem) {
    for (id, global) in system.players().iter() {
        assert_eq!(
            global.games,
            global.wins + global.losses + global.draws,
            "player {} global counters",
            id
        );
        let mut sum = PlayerStats::default();
        for (_, tournament) in system.tournaments().iter() {
            if let Some(local) = tournament.players().get(id) {
                sum.accumulate(local, UpdateMode::Apply);
            }
        }
        assert_eq!(*global, sum, "player {} global vs sum of tournaments", id);
    }
    for (tid, tournament) in system.tournaments().iter() {
        for (id, local) in tournament.players().iter() {
            assert_eq!(
                local.games,
                local.wins + local.losses + local.draws,
                "player {} counters in tournament {}",
                id,
                tid
            );
            assert!(
                system.players().exists(id),
                "player {} of tournament {} missing globally",
                id,
                tid
            );
        }
    }
}
