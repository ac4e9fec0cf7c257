//! PlayerStats and the PlayerRegistry that maps player ids to them.

use std::ops::{Add, Sub};

use serde::Serialize;

use crate::error::{ChessError, ChessResult};
use crate::map::OrderedMap;
use crate::models::game::Duel;

/// Identifier for a player. Only positive values are valid.
pub type PlayerId = i32;

pub fn player_id_is_valid(id: PlayerId) -> bool {
    id > 0
}

/// How a single game ended for one particular player.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerResult {
    Win,
    Loss,
    Draw,
}

/// Whether an update adds a game to the stats or takes it back out.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UpdateMode {
    Apply,
    Undo,
}

/// Aggregate statistics for one player. `games == wins + losses + draws` always holds.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct PlayerStats {
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    /// Sum of the durations of all games played.
    pub total_time: u64,
}

impl PlayerStats {
    /// Contribution of a single game to one player's stats.
    pub fn single_game(result: PlayerResult, duration: u32) -> Self {
        Self {
            games: 1,
            wins: u32::from(result == PlayerResult::Win),
            losses: u32::from(result == PlayerResult::Loss),
            draws: u32::from(result == PlayerResult::Draw),
            total_time: u64::from(duration),
        }
    }

    /// Add (`Apply`) or subtract (`Undo`) `delta` field by field.
    ///
    /// This is the only place player counters are changed, for both the global registry
    /// and every tournament-local one.
    pub fn accumulate(&mut self, delta: &PlayerStats, mode: UpdateMode) {
        shift(&mut self.games, delta.games, mode);
        shift(&mut self.wins, delta.wins, mode);
        shift(&mut self.losses, delta.losses, mode);
        shift(&mut self.draws, delta.draws, mode);
        shift(&mut self.total_time, delta.total_time, mode);
    }

    /// `(6·wins − 10·losses + 2·draws) / games`, or 0 with no games.
    pub fn level(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        let weighted = 6 * i64::from(self.wins) - 10 * i64::from(self.losses)
            + 2 * i64::from(self.draws);
        weighted as f64 / f64::from(self.games)
    }

    /// Tournament score: two points per win, one per draw.
    pub fn score(&self) -> u32 {
        2 * self.wins + self.draws
    }

    pub fn average_play_time(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_time as f64 / f64::from(self.games)
    }
}

fn shift<T>(value: &mut T, by: T, mode: UpdateMode)
where
    T: Copy + Default + Ord + Add<Output = T> + Sub<Output = T>,
{
    *value = match mode {
        UpdateMode::Apply => *value + by,
        UpdateMode::Undo => {
            debug_assert!(*value >= by, "undo would drop a counter below zero");
            if *value >= by {
                *value - by
            } else {
                log::warn!("Undo would drop a stats counter below zero, clamping to zero");
                T::default()
            }
        }
    };
}

/// Map from player id to that player's stats.
///
/// The system holds one global registry and one per tournament; they never share entries,
/// the update protocol keeps them in sync.
#[derive(Clone, Debug, Default)]
pub struct PlayerRegistry {
    players: OrderedMap<PlayerId, PlayerStats>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding at most `limit` players (`None` = unbounded).
    pub fn with_capacity_limit(limit: Option<usize>) -> Self {
        Self {
            players: OrderedMap::with_capacity_limit(limit),
        }
    }

    /// Insert a zeroed entry for `id`. Returns `false` if the player was already present.
    pub fn add(&mut self, id: PlayerId) -> ChessResult<bool> {
        if self.players.contains(&id) {
            return Ok(false);
        }
        self.players.put_owned(id, PlayerStats::default())?;
        Ok(true)
    }

    pub fn remove(&mut self, id: PlayerId) -> ChessResult<PlayerStats> {
        self.players
            .remove(&id)
            .ok_or(ChessError::PlayerNotFound(id))
    }

    pub fn exists(&self, id: PlayerId) -> bool {
        self.players.contains(&id)
    }

    pub fn get(&self, id: PlayerId) -> Option<&PlayerStats> {
        self.players.get(&id)
    }

    /// True iff the player has already played `limit` games or more. Absent players never exceed.
    pub fn exceeded_games(&self, id: PlayerId, limit: u32) -> bool {
        self.players
            .get(&id)
            .is_some_and(|stats| stats.games >= limit)
    }

    /// Apply or undo `delta` on one player's entry.
    pub fn accumulate(
        &mut self,
        id: PlayerId,
        delta: &PlayerStats,
        mode: UpdateMode,
    ) -> ChessResult<()> {
        let stats = self
            .players
            .get_mut(&id)
            .ok_or(ChessError::PlayerNotFound(id))?;
        stats.accumulate(delta, mode);
        Ok(())
    }

    /// Record (or take back) a game on both participants. Both must already be present;
    /// nothing is changed otherwise.
    pub fn apply_duel(&mut self, duel: &Duel, mode: UpdateMode) -> ChessResult<()> {
        for id in [duel.first, duel.second] {
            if !self.exists(id) {
                return Err(ChessError::PlayerNotFound(id));
            }
        }
        let duration = duel.duration;
        self.accumulate(
            duel.first,
            &PlayerStats::single_game(duel.outcome.result_for_first(), duration),
            mode,
        )?;
        self.accumulate(
            duel.second,
            &PlayerStats::single_game(duel.outcome.result_for_second(), duration),
            mode,
        )
    }

    /// Turn a finished game of `id` into a win, keeping its duration and game count.
    pub fn record_forfeit_win(&mut self, id: PlayerId, previous: PlayerResult) -> ChessResult<()> {
        if previous == PlayerResult::Win {
            return Ok(());
        }
        self.accumulate(id, &PlayerStats::single_game(previous, 0), UpdateMode::Undo)?;
        self.accumulate(
            id,
            &PlayerStats::single_game(PlayerResult::Win, 0),
            UpdateMode::Apply,
        )
    }

    pub fn level(&self, id: PlayerId) -> Option<f64> {
        self.players.get(&id).map(PlayerStats::level)
    }

    pub fn score(&self, id: PlayerId) -> Option<u32> {
        self.players.get(&id).map(PlayerStats::score)
    }

    /// Player with the strictly highest level; ties go to the smallest id.
    /// With `remove`, that player's entry is evicted, so repeated calls yield a ranking.
    pub fn max_level_and_remove(&mut self, remove: bool) -> Option<(PlayerId, f64)> {
        let mut best: Option<(PlayerId, f64)> = None;
        for (&id, stats) in self.players.iter() {
            let level = stats.level();
            if best.map_or(true, |(_, best_level)| level > best_level) {
                best = Some((id, level));
            }
        }
        if remove {
            if let Some((id, _)) = best {
                self.players.remove(&id);
            }
        }
        best
    }

    /// Tournament champion: highest score, then fewest losses, then most wins, then smallest id.
    pub fn winner(&self) -> Option<PlayerId> {
        let mut best: Option<(PlayerId, &PlayerStats)> = None;
        for (&id, stats) in self.players.iter() {
            let better = match best {
                None => true,
                Some((best_id, best_stats)) => ranks_above(id, stats, best_id, best_stats),
            };
            if better {
                best = Some((id, stats));
            }
        }
        best.map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &PlayerStats)> + '_ {
        self.players.iter().map(|(&id, stats)| (id, stats))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Independent deep copy of the registry.
    pub fn try_copy(&self) -> ChessResult<Self> {
        Ok(Self {
            players: self.players.try_copy()?,
        })
    }
}

fn ranks_above(id: PlayerId, stats: &PlayerStats, other_id: PlayerId, other: &PlayerStats) -> bool {
    if stats.score() != other.score() {
        return stats.score() > other.score();
    }
    if stats.losses != other.losses {
        return stats.losses < other.losses;
    }
    if stats.wins != other.wins {
        return stats.wins > other.wins;
    }
    id < other_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game::GameOutcome;

    fn duel(first: PlayerId, second: PlayerId, outcome: GameOutcome, duration: u32) -> Duel {
        Duel {
            first,
            second,
            outcome,
            duration,
        }
    }

    #[test]
    fn apply_then_undo_restores_stats() {
        let mut registry = PlayerRegistry::new();
        registry.add(1).unwrap();
        registry.add(2).unwrap();
        let d = duel(1, 2, GameOutcome::FirstPlayer, 30);
        registry.apply_duel(&d, UpdateMode::Apply).unwrap();
        assert_eq!(registry.get(1).unwrap().wins, 1);
        assert_eq!(registry.get(2).unwrap().losses, 1);
        registry.apply_duel(&d, UpdateMode::Undo).unwrap();
        assert_eq!(registry.get(1), Some(&PlayerStats::default()));
        assert_eq!(registry.get(2), Some(&PlayerStats::default()));
    }

    #[test]
    fn apply_duel_requires_both_players() {
        let mut registry = PlayerRegistry::new();
        registry.add(1).unwrap();
        let d = duel(1, 2, GameOutcome::Draw, 5);
        assert!(matches!(
            registry.apply_duel(&d, UpdateMode::Apply),
            Err(ChessError::PlayerNotFound(2))
        ));
        assert_eq!(registry.get(1), Some(&PlayerStats::default()));
    }

    #[test]
    fn level_is_zero_without_games() {
        let mut registry = PlayerRegistry::new();
        registry.add(3).unwrap();
        assert_eq!(registry.level(3), Some(0.0));
        assert_eq!(registry.level(4), None);
    }

    #[test]
    fn max_level_ties_go_to_smallest_id() {
        let mut registry = PlayerRegistry::new();
        for id in [4, 2, 9] {
            registry.add(id).unwrap();
        }
        registry
            .apply_duel(&duel(4, 9, GameOutcome::Draw, 1), UpdateMode::Apply)
            .unwrap();
        registry
            .apply_duel(&duel(2, 9, GameOutcome::Draw, 1), UpdateMode::Apply)
            .unwrap();
        // 2 and 4 both have level 2.0, 9 has two draws -> also 2.0
        assert_eq!(registry.max_level_and_remove(true), Some((2, 2.0)));
        assert_eq!(registry.max_level_and_remove(true), Some((4, 2.0)));
        assert_eq!(registry.max_level_and_remove(false), Some((9, 2.0)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn exceeded_games_is_inclusive() {
        let mut registry = PlayerRegistry::new();
        registry.add(1).unwrap();
        registry.add(2).unwrap();
        registry
            .apply_duel(&duel(1, 2, GameOutcome::SecondPlayer, 0), UpdateMode::Apply)
            .unwrap();
        assert!(registry.exceeded_games(1, 1));
        assert!(!registry.exceeded_games(1, 2));
        assert!(!registry.exceeded_games(7, 0));
    }

    #[test]
    fn forfeit_converts_draw_into_win() {
        let mut registry = PlayerRegistry::new();
        registry.add(1).unwrap();
        registry.add(2).unwrap();
        registry
            .apply_duel(&duel(1, 2, GameOutcome::Draw, 10), UpdateMode::Apply)
            .unwrap();
        registry.record_forfeit_win(2, PlayerResult::Draw).unwrap();
        let stats = registry.get(2).unwrap();
        assert_eq!((stats.games, stats.wins, stats.draws), (1, 1, 0));
        assert_eq!(stats.total_time, 10);
    }
}
