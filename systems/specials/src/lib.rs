#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Special object system: decides when specials appear, where they land, and
//! what they do once the player triggers them.

use log::debug;
use mapgame_core::{BoardError, Entity, EventGate, Position, SpecialId, SpecialKind, SpecialObj};
use mapgame_world::Board;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the specials system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration seeding the spawn rolls with `rng_seed`.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Deterministic spawner that rolls, identifies and places special objects.
#[derive(Debug)]
pub struct Specials {
    rng: ChaCha8Rng,
    next_id: SpecialId,
}

impl Specials {
    /// Creates a new specials system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            next_id: SpecialId::new(0),
        }
    }

    /// Rolls every kind once against its spawn weight, returning the kinds
    /// that should appear this turn in [`SpecialKind::ALL`] order.
    pub fn roll(&mut self) -> Vec<SpecialKind> {
        SpecialKind::ALL
            .into_iter()
            .filter(|kind| self.rng.gen_bool(kind.spawn_weight()))
            .collect()
    }

    /// Places a freshly identified special of `kind` at the position chosen
    /// by [`choose_spawn_position`].
    pub fn spawn<G: EventGate>(
        &mut self,
        board: &mut Board<G>,
        kind: SpecialKind,
    ) -> Result<(Position, SpecialObj), BoardError> {
        let position = choose_spawn_position(board)?;
        let special = SpecialObj::new(self.allocate_id(), kind);
        board.place(position, Entity::from(special))?;
        debug!("{} {} spawned at {position}", kind.name(), special.id().get());
        Ok((position, special))
    }

    fn allocate_id(&mut self) -> SpecialId {
        let id = self.next_id;
        self.next_id = SpecialId::new(id.get().wrapping_add(1));
        id
    }
}

/// Default spawn policy: a uniformly random empty cell.
pub fn choose_spawn_position<G>(board: &mut Board<G>) -> Result<Position, BoardError> {
    board.random_empty_position()
}

/// Result of triggering a special object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A bomb went off next to the player.
    Detonated {
        /// Enemies removed from the board.
        destroyed: usize,
        /// Enemies whose death was cancelled.
        spared: usize,
    },
    /// A barrier raised obstacles around the player.
    Fortified {
        /// Obstacles written into empty neighbours.
        raised: usize,
        /// Obstacle spawns that were cancelled.
        refused: usize,
    },
}

/// Applies the effect of `special` for the player standing at `player`.
///
/// Only the four axis-aligned neighbours inside the board are affected. Every
/// mutation goes through the board's gated operations, so vetoed deaths and
/// spawns are counted instead of applied.
pub fn execute<G: EventGate>(
    special: &SpecialObj,
    board: &mut Board<G>,
    player: Position,
) -> Result<Outcome, BoardError> {
    board.ensure_contains(player)?;
    let neighbors: Vec<Position> = player
        .neighbors()
        .filter(|position| board.contains(*position))
        .collect();

    let outcome = match special.kind() {
        SpecialKind::Bomb => detonate(board, &neighbors)?,
        SpecialKind::Barrier => fortify(board, &neighbors)?,
    };
    debug!(
        "{} {} triggered next to {player}: {outcome:?}",
        special.kind().name(),
        special.id().get()
    );
    Ok(outcome)
}

fn detonate<G: EventGate>(
    board: &mut Board<G>,
    neighbors: &[Position],
) -> Result<Outcome, BoardError> {
    let mut destroyed = 0;
    let mut spared = 0;
    for &position in neighbors {
        if board.get(position)?.and_then(Entity::as_enemy).is_none() {
            continue;
        }
        match board.remove(position) {
            Ok(_) => destroyed += 1,
            Err(BoardError::DeathCancelled { .. }) => spared += 1,
            Err(error) => return Err(error),
        }
    }
    Ok(Outcome::Detonated { destroyed, spared })
}

fn fortify<G: EventGate>(
    board: &mut Board<G>,
    neighbors: &[Position],
) -> Result<Outcome, BoardError> {
    let mut raised = 0;
    let mut refused = 0;
    for &position in neighbors {
        if !board.is_empty(position)? {
            continue;
        }
        match board.place(position, Entity::Obstacle) {
            Ok(()) => raised += 1,
            Err(BoardError::SpawnCancelled { .. }) => refused += 1,
            Err(error) => return Err(error),
        }
    }
    Ok(Outcome::Fortified { raised, refused })
}
