//! Adding a game: one call touches the game registry, the global player registry and the
//! tournament-local player registry, and either all of them change or none do.

use crate::error::{ChessError, ChessResult};
use crate::models::{
    player_id_is_valid, tournament_id_is_valid, Duel, GameOutcome, PlayerId, PlayerRegistry,
    Tournament, TournamentId, TournamentRegistry, UpdateMode,
};

/// Record a game in a tournament.
///
/// 1. Validate (no mutation on failure): ids, tournament exists and is running, the pair has
///    not played yet, duration is non-negative, neither player is at the game limit.
/// 2. Store the game.
/// 3. Apply the result to the global registry, adding players on first appearance.
/// 4. Apply the result to the tournament-local registry.
/// 5. Update the tournament aggregates, counting first-time participants.
///
/// A failure in steps 2-4 undoes every earlier step before the error is returned.
pub fn add_game(
    tournaments: &mut TournamentRegistry,
    global: &mut PlayerRegistry,
    tournament_id: TournamentId,
    first: PlayerId,
    second: PlayerId,
    outcome: GameOutcome,
    duration: i32,
) -> ChessResult<()> {
    if !tournament_id_is_valid(tournament_id)
        || !player_id_is_valid(first)
        || !player_id_is_valid(second)
        || first == second
    {
        return Err(ChessError::InvalidId);
    }
    let tournament = tournaments.get_mut(tournament_id)?;
    if tournament.has_ended() {
        return Err(ChessError::TournamentEnded(tournament_id));
    }
    let duration = tournament.games().validate(first, second, duration)?;
    let max_games = tournament.max_games_per_player();
    for id in [first, second] {
        if tournament.players().exceeded_games(id, max_games) {
            return Err(ChessError::ExceededGames(id));
        }
    }

    let duel = Duel {
        first,
        second,
        outcome,
        duration,
    };
    let mut txn = GameTransaction::begin(tournament_id, tournament, global, duel);
    txn.insert_game()?;
    txn.apply(Scope::Global)?;
    txn.apply(Scope::Local)?;
    txn.note_participants()?;
    txn.commit();

    log::debug!(
        "Tournament {}: game {} vs {} ({:?}, {}s) added",
        tournament_id,
        first,
        second,
        outcome,
        duration
    );
    Ok(())
}

#[derive(Clone, Copy, Debug)]
enum Scope {
    Global,
    Local,
}

/// What one registry has had done to it so far.
#[derive(Clone, Copy, Debug, Default)]
struct Progress {
    /// Per participant (first, second): inserted by this transaction.
    added: [bool; 2],
    applied: bool,
}

/// In-flight `add_game`. Dropping it without [`GameTransaction::commit`] reverts
/// every step that completed, newest first.
struct GameTransaction<'a> {
    tournament_id: TournamentId,
    tournament: &'a mut Tournament,
    global: &'a mut PlayerRegistry,
    duel: Duel,
    game_inserted: bool,
    /// Per participant (first, second): first appearance in this tournament.
    noted: [bool; 2],
    global_progress: Progress,
    local_progress: Progress,
    committed: bool,
}

impl<'a> GameTransaction<'a> {
    fn begin(
        tournament_id: TournamentId,
        tournament: &'a mut Tournament,
        global: &'a mut PlayerRegistry,
        duel: Duel,
    ) -> Self {
        Self {
            tournament_id,
            tournament,
            global,
            duel,
            game_inserted: false,
            noted: [false; 2],
            global_progress: Progress::default(),
            local_progress: Progress::default(),
            committed: false,
        }
    }

    fn registry(&mut self, scope: Scope) -> &mut PlayerRegistry {
        match scope {
            Scope::Global => &mut *self.global,
            Scope::Local => self.tournament.players_mut(),
        }
    }

    fn progress_mut(&mut self, scope: Scope) -> &mut Progress {
        match scope {
            Scope::Global => &mut self.global_progress,
            Scope::Local => &mut self.local_progress,
        }
    }

    fn insert_game(&mut self) -> ChessResult<()> {
        self.tournament.games_mut().insert(&self.duel)?;
        self.game_inserted = true;
        Ok(())
    }

    /// Same update for either registry: add missing players, then apply the duel.
    fn apply(&mut self, scope: Scope) -> ChessResult<()> {
        let duel = self.duel;
        for (slot, id) in [duel.first, duel.second].into_iter().enumerate() {
            let added = self.registry(scope).add(id)?;
            self.progress_mut(scope).added[slot] = added;
        }
        self.registry(scope).apply_duel(&duel, UpdateMode::Apply)?;
        self.progress_mut(scope).applied = true;
        Ok(())
    }

    fn note_participants(&mut self) -> ChessResult<()> {
        for (slot, id) in [self.duel.first, self.duel.second].into_iter().enumerate() {
            self.noted[slot] = self.tournament.note_participant(id)?;
        }
        Ok(())
    }

    fn revert(&mut self, scope: Scope) {
        let progress = *self.progress_mut(scope);
        let duel = self.duel;
        let registry = self.registry(scope);
        if progress.applied {
            // both players are present, so this cannot fail
            let _ = registry.apply_duel(&duel, UpdateMode::Undo);
        }
        for (slot, id) in [duel.first, duel.second].into_iter().enumerate() {
            if progress.added[slot] {
                let _ = registry.remove(id);
            }
        }
    }

    fn commit(mut self) {
        self.tournament.record_game(self.duel.duration);
        self.committed = true;
    }
}

impl Drop for GameTransaction<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        log::warn!(
            "Tournament {}: rolling back game {} vs {}",
            self.tournament_id,
            self.duel.first,
            self.duel.second
        );
        for (slot, id) in [self.duel.first, self.duel.second].into_iter().enumerate() {
            if self.noted[slot] {
                self.tournament.forget_participant(id);
            }
        }
        self.revert(Scope::Local);
        self.revert(Scope::Global);
        if self.game_inserted {
            self.tournament
                .games_mut()
                .remove(self.duel.first, self.duel.second);
        }
    }
}
