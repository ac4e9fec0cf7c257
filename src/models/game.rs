//! Games between two players and the per-tournament GameRegistry.

use serde::Serialize;

use crate::error::{ChessError, ChessResult};
use crate::map::OrderedMap;
use crate::models::player::{PlayerId, PlayerResult};

/// Who won a game, relative to the order the two players were given in.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    FirstPlayer,
    SecondPlayer,
    Draw,
}

impl GameOutcome {
    /// Same game seen with the two players swapped.
    pub fn flipped(self) -> Self {
        match self {
            GameOutcome::FirstPlayer => GameOutcome::SecondPlayer,
            GameOutcome::SecondPlayer => GameOutcome::FirstPlayer,
            GameOutcome::Draw => GameOutcome::Draw,
        }
    }

    pub fn result_for_first(self) -> PlayerResult {
        match self {
            GameOutcome::FirstPlayer => PlayerResult::Win,
            GameOutcome::SecondPlayer => PlayerResult::Loss,
            GameOutcome::Draw => PlayerResult::Draw,
        }
    }

    pub fn result_for_second(self) -> PlayerResult {
        self.flipped().result_for_first()
    }
}

/// One played game, with the outcome relative to `first` / `second`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Duel {
    pub first: PlayerId,
    pub second: PlayerId,
    pub outcome: GameOutcome,
    pub duration: u32,
}

/// Unordered pair of two players, stored with the smaller id first.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct GameKey {
    low: PlayerId,
    high: PlayerId,
}

impl GameKey {
    /// Canonical key for the pair, and whether `a`/`b` had to be swapped to build it.
    pub fn canonical(a: PlayerId, b: PlayerId) -> (Self, bool) {
        if a <= b {
            (Self { low: a, high: b }, false)
        } else {
            (Self { low: b, high: a }, true)
        }
    }

    pub fn low(&self) -> PlayerId {
        self.low
    }

    pub fn high(&self) -> PlayerId {
        self.high
    }

    pub fn involves(&self, id: PlayerId) -> bool {
        self.low == id || self.high == id
    }
}

/// Stored game. `outcome` is relative to the canonical key order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct GameRecord {
    pub duration: u32,
    pub outcome: GameOutcome,
}

/// A game seen from one participant: `outcome` treats that participant as the first player.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParticipantGame {
    pub opponent: PlayerId,
    pub outcome: GameOutcome,
    pub duration: u32,
}

/// All games of one tournament, one record per unordered pair of players.
#[derive(Clone, Debug, Default)]
pub struct GameRegistry {
    games: OrderedMap<GameKey, GameRecord>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding at most `limit` games (`None` = unbounded).
    pub fn with_capacity_limit(limit: Option<usize>) -> Self {
        Self {
            games: OrderedMap::with_capacity_limit(limit),
        }
    }

    /// Check that `a` and `b` have not played yet and that `duration` is usable.
    /// Zero duration is allowed, negative is not.
    pub fn validate(&self, a: PlayerId, b: PlayerId, duration: i32) -> ChessResult<u32> {
        if self.exists(a, b) {
            return Err(already_exists(a, b));
        }
        u32::try_from(duration).map_err(|_| ChessError::InvalidPlayTime(duration))
    }

    /// Store a game.
    pub fn add(
        &mut self,
        a: PlayerId,
        b: PlayerId,
        duration: i32,
        outcome: GameOutcome,
    ) -> ChessResult<()> {
        let duration = self.validate(a, b, duration)?;
        self.store(a, b, duration, outcome)
    }

    /// Store an already validated duel.
    pub(crate) fn insert(&mut self, duel: &Duel) -> ChessResult<()> {
        if self.exists(duel.first, duel.second) {
            return Err(already_exists(duel.first, duel.second));
        }
        self.store(duel.first, duel.second, duel.duration, duel.outcome)
    }

    fn store(
        &mut self,
        a: PlayerId,
        b: PlayerId,
        duration: u32,
        outcome: GameOutcome,
    ) -> ChessResult<()> {
        let (key, swapped) = GameKey::canonical(a, b);
        let outcome = if swapped { outcome.flipped() } else { outcome };
        self.games.put_owned(key, GameRecord { duration, outcome })?;
        Ok(())
    }

    /// Delete the game between `a` and `b`, if there is one.
    pub fn remove(&mut self, a: PlayerId, b: PlayerId) -> Option<GameRecord> {
        let (key, _) = GameKey::canonical(a, b);
        self.games.remove(&key)
    }

    pub fn exists(&self, a: PlayerId, b: PlayerId) -> bool {
        let (key, _) = GameKey::canonical(a, b);
        self.games.contains(&key)
    }

    /// The game between `a` and `b`, with its outcome expressed relative to `(a, b)`.
    pub fn find(&self, a: PlayerId, b: PlayerId) -> Option<GameRecord> {
        let (key, swapped) = GameKey::canonical(a, b);
        self.games.get(&key).map(|record| GameRecord {
            duration: record.duration,
            outcome: if swapped {
                record.outcome.flipped()
            } else {
                record.outcome
            },
        })
    }

    /// Lazily walk every game `id` took part in. Call again to restart.
    pub fn find_by_participant(&self, id: PlayerId) -> ParticipantGames<'_> {
        ParticipantGames {
            registry: self,
            cursor: ParticipantCursor::new(id),
        }
    }

    pub fn size(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GameKey, &GameRecord)> + '_ {
        self.games.iter()
    }
}

fn already_exists(a: PlayerId, b: PlayerId) -> ChessError {
    let (key, _) = GameKey::canonical(a, b);
    ChessError::GameAlreadyExists {
        first: key.low,
        second: key.high,
    }
}

/// Position in a walk over one participant's games.
///
/// Unlike [`ParticipantGames`] it does not borrow the registry between steps, so the caller
/// may delete games while walking (see [`ParticipantCursor::next_removing`]).
#[derive(Clone, Copy, Debug)]
pub struct ParticipantCursor {
    participant: PlayerId,
    position: Option<GameKey>,
    done: bool,
}

impl ParticipantCursor {
    pub fn new(participant: PlayerId) -> Self {
        Self {
            participant,
            position: None,
            done: false,
        }
    }

    fn advance(&mut self, registry: &GameRegistry) -> Option<(GameKey, ParticipantGame)> {
        if self.done {
            return None;
        }
        loop {
            let next = match &self.position {
                None => registry.games.first_key(),
                Some(key) => registry.games.next_key_after(key),
            };
            let Some(&key) = next else {
                self.done = true;
                return None;
            };
            self.position = Some(key);
            if !key.involves(self.participant) {
                continue;
            }
            let Some(record) = registry.games.get(&key) else {
                continue;
            };
            let game = if key.low == self.participant {
                ParticipantGame {
                    opponent: key.high,
                    outcome: record.outcome,
                    duration: record.duration,
                }
            } else {
                ParticipantGame {
                    opponent: key.low,
                    outcome: record.outcome.flipped(),
                    duration: record.duration,
                }
            };
            return Some((key, game));
        }
    }

    /// Next game of the participant.
    pub fn next(&mut self, registry: &GameRegistry) -> Option<ParticipantGame> {
        self.advance(registry).map(|(_, game)| game)
    }

    /// Next game of the participant, deleting it from the registry.
    pub fn next_removing(&mut self, registry: &mut GameRegistry) -> Option<ParticipantGame> {
        let (key, game) = self.advance(registry)?;
        registry.games.remove(&key);
        Some(game)
    }
}

/// Iterator over one participant's games, from [`GameRegistry::find_by_participant`].
pub struct ParticipantGames<'a> {
    registry: &'a GameRegistry,
    cursor: ParticipantCursor,
}

impl Iterator for ParticipantGames<'_> {
    type Item = ParticipantGame;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next(self.registry)
    }
}
