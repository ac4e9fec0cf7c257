//! Integration tests for the level and tournament statistics reports.

mod common;

use chess_tournament::{ChessError, GameOutcome};
use common::system_with_tournaments;

#[test]
fn player_levels_best_first_ties_by_id() {
    let mut system = system_with_tournaments(&[1]);
    system
        .add_game(1, 1, 2, GameOutcome::FirstPlayer, 10)
        .unwrap();
    system.add_game(1, 3, 1, GameOutcome::Draw, 10).unwrap();
    system
        .add_game(1, 2, 3, GameOutcome::SecondPlayer, 10)
        .unwrap();

    let mut out = Vec::new();
    system.save_player_levels(&mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "1 4.00\n3 4.00\n2 -10.00\n"
    );
}

#[test]
fn player_levels_leave_registry_untouched() {
    let mut system = system_with_tournaments(&[1]);
    system.add_game(1, 1, 2, GameOutcome::Draw, 10).unwrap();
    let before = system.snapshot();
    let mut out = Vec::new();
    system.save_player_levels(&mut out).unwrap();
    assert_eq!(before, system.snapshot());

    let mut empty = Vec::new();
    system_with_tournaments(&[])
        .save_player_levels(&mut empty)
        .unwrap();
    assert!(empty.is_empty());
}

#[test]
fn statistics_require_an_ended_tournament() {
    let mut system = system_with_tournaments(&[1]);
    system.add_game(1, 1, 2, GameOutcome::Draw, 10).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.txt");
    assert!(matches!(
        system.save_tournament_statistics(&path),
        Err(ChessError::NoTournamentsEnded)
    ));
    assert!(!path.exists());
}

#[test]
fn statistics_of_ended_tournaments_in_id_order() {
    let mut system = system_with_tournaments(&[1, 2]);
    system.add_tournament(3, 5, "Beer sheva").unwrap();
    system
        .add_game(1, 1, 2, GameOutcome::FirstPlayer, 10)
        .unwrap();
    system.add_game(1, 1, 3, GameOutcome::Draw, 25).unwrap();
    system.add_game(2, 1, 2, GameOutcome::Draw, 7).unwrap();
    system
        .add_game(3, 4, 5, GameOutcome::SecondPlayer, 4)
        .unwrap();
    system.end_tournament(3).unwrap();
    system.end_tournament(1).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.txt");
    system.save_tournament_statistics(&path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        "1\n25\n17.50\nHaifa\n2\n3\n5\n4\n4.00\nBeer sheva\n1\n2\n"
    );

    let mut out = Vec::new();
    system.write_tournament_statistics(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), written);
}

#[test]
fn statistics_to_unwritable_path_fail() {
    let mut system = system_with_tournaments(&[1]);
    system.add_game(1, 1, 2, GameOutcome::Draw, 10).unwrap();
    system.end_tournament(1).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("stats.txt");
    assert!(matches!(
        system.save_tournament_statistics(&path),
        Err(ChessError::SaveFailure(_))
    ));
}

#[test]
fn snapshot_serializes() {
    let mut system = system_with_tournaments(&[1]);
    system
        .add_game(1, 2, 1, GameOutcome::FirstPlayer, 10)
        .unwrap();
    let value = serde_json::to_value(system.snapshot()).unwrap();
    assert_eq!(value["players"][0][0], 1);
    assert_eq!(value["players"][0][1]["losses"], 1);
    let game = &value["tournaments"][0]["games"][0];
    assert_eq!(game[0]["low"], 1);
    assert_eq!(game[1]["outcome"], "second_player");
    assert_eq!(value["tournaments"][0]["summary"]["location"], "Haifa");
}
