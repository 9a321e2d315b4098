#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state for the map game.
//!
//! The [`Board`] is the single source of truth for what occupies which cell.
//! It stamps a wall of obstacles around its perimeter, keeps at most one
//! entity per cell, and routes every spawn and every enemy death through the
//! [`EventGate`] it was constructed with before touching the grid.

mod grid;
mod render;

use std::mem;

use log::{debug, warn};
use mapgame_core::{
    AllowAll, BoardError, Command, Direction, Entity, Event, EventGate, Position, VariantTag,
};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::grid::CellGrid;

const DEFAULT_BOARD_SIZE: u32 = 10;
const DEFAULT_SEED: u64 = 0x6d61_7067_616d_6521;

/// Construction parameters for a [`Board`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardConfig {
    size: u32,
    seed: u64,
}

impl BoardConfig {
    /// Creates a configuration for a `size` x `size` board whose random
    /// draws derive from `seed`.
    #[must_use]
    pub const fn new(size: u32, seed: u64) -> Self {
        Self { size, seed }
    }

    /// Side length of the board.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Seed of the board's random number generator.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_SIZE, DEFAULT_SEED)
    }
}

/// Square grid of optional entities surrounded by a wall of obstacles.
#[derive(Debug)]
pub struct Board<G = AllowAll> {
    grid: CellGrid,
    gate: G,
    rng: ChaCha8Rng,
}

impl<G> Board<G> {
    /// Creates an empty `size` x `size` board with its border walled off.
    pub fn new(size: u32, gate: G) -> Result<Self, BoardError> {
        Self::with_config(BoardConfig::new(size, DEFAULT_SEED), gate)
    }

    /// Creates an empty board from an explicit configuration.
    pub fn with_config(config: BoardConfig, gate: G) -> Result<Self, BoardError> {
        let grid = CellGrid::new(config.size())?;
        Ok(Self::walled(grid, gate, config.seed()))
    }

    /// Adopts a pre-filled square grid indexed as `rows[y][x]`.
    ///
    /// Edge cells are overwritten with obstacles; interior cells are kept as
    /// provided. No gate hooks run during construction.
    pub fn from_grid(rows: Vec<Vec<Option<Entity>>>, gate: G) -> Result<Self, BoardError> {
        let grid = CellGrid::from_rows(rows)?;
        Ok(Self::walled(grid, gate, DEFAULT_SEED))
    }

    fn walled(mut grid: CellGrid, gate: G, seed: u64) -> Self {
        grid.stamp_border();
        Self {
            grid,
            gate,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Restarts the random number generator from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Side length of the board.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.grid.size()
    }

    /// Provides read-only access to the gate.
    #[must_use]
    pub fn gate(&self) -> &G {
        &self.gate
    }

    /// Provides mutable access to the gate.
    pub fn gate_mut(&mut self) -> &mut G {
        &mut self.gate
    }

    /// Consumes the board, yielding its gate.
    pub fn into_gate(self) -> G {
        self.gate
    }

    /// Reports whether `position` lies on the board.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.grid.index(position).is_some()
    }

    /// Fails with [`BoardError::OutOfBounds`] unless `position` lies on the
    /// board.
    pub fn ensure_contains(&self, position: Position) -> Result<(), BoardError> {
        self.grid.checked_index(position).map(|_| ())
    }

    /// Returns the occupant of `position`, if any.
    pub fn get(&self, position: Position) -> Result<Option<&Entity>, BoardError> {
        let index = self.grid.checked_index(position)?;
        Ok(self.grid.get(index))
    }

    /// Reports whether `position` holds no entity.
    pub fn is_empty(&self, position: Position) -> Result<bool, BoardError> {
        Ok(self.get(position)?.is_none())
    }

    /// Reports whether the occupant of `position` equals `candidate`, where
    /// `None` matches only an empty cell.
    pub fn equals_at(
        &self,
        position: Position,
        candidate: Option<&Entity>,
    ) -> Result<bool, BoardError> {
        Ok(self.get(position)? == candidate)
    }

    /// Every position on the board in row-major order.
    ///
    /// The sequence is recomputed on every call.
    pub fn all_positions(&self) -> impl Iterator<Item = Position> {
        let side = self.grid.side();
        (0..side).flat_map(move |y| (0..side).map(move |x| Position::new(x, y)))
    }

    /// Positions holding an entity, in row-major order.
    pub fn occupied_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.grid
            .iter()
            .filter_map(|(position, cell)| cell.map(|_| position))
    }

    /// Positions holding no entity, in row-major order.
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.grid
            .iter()
            .filter_map(|(position, cell)| cell.is_none().then_some(position))
    }

    /// First position in row-major order whose occupant equals `entity`.
    #[must_use]
    pub fn locate(&self, entity: &Entity) -> Option<Position> {
        self.grid
            .iter()
            .find_map(|(position, cell)| (cell == Some(entity)).then_some(position))
    }

    /// Positions whose occupant carries `tag` or belongs to the `tag` family.
    pub fn positions_by_variant(&self, tag: VariantTag) -> impl Iterator<Item = Position> + '_ {
        self.grid.iter().filter_map(move |(position, cell)| {
            cell.is_some_and(|entity| tag.matches(entity.tag()))
                .then_some(position)
        })
    }

    /// Occupants matching `tag`, in row-major order.
    ///
    /// Only direct children of [`VariantTag::Entity`] may be queried; any
    /// other tag yields [`BoardError::InvalidVariantQuery`].
    pub fn objects_by_variant(&self, tag: VariantTag) -> Result<Vec<&Entity>, BoardError> {
        if !tag.is_top_level() {
            return Err(BoardError::InvalidVariantQuery { tag });
        }

        Ok(self
            .grid
            .iter()
            .filter_map(|(_, cell)| cell.filter(|entity| tag.matches(entity.tag())))
            .collect())
    }

    /// Picks a uniformly random empty position.
    pub fn random_empty_position(&mut self) -> Result<Position, BoardError> {
        let empty: Vec<Position> = self.empty_positions().collect();
        empty.choose(&mut self.rng).copied().ok_or_else(|| {
            warn!("no empty cell left on the {0}x{0} board", self.grid.size());
            BoardError::NoSpaceAvailable
        })
    }

    /// Picks one of the four axis-aligned neighbours of `position` uniformly.
    ///
    /// The result is neither bounds- nor occupancy-checked; callers validate
    /// it before use.
    pub fn random_neighbor(&mut self, position: Position) -> Position {
        let index = self.rng.gen_range(0..Direction::ALL.len());
        position.offset(Direction::ALL[index])
    }

    /// Renders the board as text, see the [`std::fmt::Display`] impl.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl<G: EventGate> Board<G> {
    /// Spawns `entity` into the empty cell at `position`.
    ///
    /// Fails without touching the board if the cell is occupied or the gate
    /// cancels the spawn.
    pub fn place(&mut self, position: Position, entity: Entity) -> Result<(), BoardError> {
        let index = self.grid.checked_index(position)?;
        if self.grid.get(index).is_some() {
            return Err(BoardError::OccupiedCell { position });
        }

        if self.gate.on_entity_spawn(&entity, position).is_cancelled() {
            debug!("spawn of {entity:?} at {position} cancelled");
            return Err(BoardError::SpawnCancelled { position });
        }

        *self.grid.slot_mut(index) = Some(entity);
        debug!("spawned {entity:?} at {position}");
        Ok(())
    }

    /// Clears `position`, returning the previous occupant.
    ///
    /// A cell holding a player is left untouched and `Ok(None)` is returned.
    pub fn remove(&mut self, position: Position) -> Result<Option<Entity>, BoardError> {
        if self.get(position)?.is_some_and(Entity::is_player) {
            debug!("refusing to remove the player at {position}");
            return Ok(None);
        }
        self.replace(position, None)
    }

    /// Unconditionally overwrites `position`, returning the previous occupant.
    ///
    /// When the cell holds an enemy, the gate is offered its death first and a
    /// cancellation leaves the enemy in place.
    pub fn replace(
        &mut self,
        position: Position,
        entity: Option<Entity>,
    ) -> Result<Option<Entity>, BoardError> {
        let index = self.grid.checked_index(position)?;
        if let Some(enemy) = self.grid.get(index).and_then(|current| current.as_enemy()) {
            if self.gate.on_enemy_death(position, enemy).is_cancelled() {
                debug!("death of enemy {} at {position} cancelled", enemy.id().get());
                return Err(BoardError::DeathCancelled { position });
            }
            debug!("enemy {} died at {position}", enemy.id().get());
        }

        Ok(mem::replace(self.grid.slot_mut(index), entity))
    }

    /// Spawns `entity` into a uniformly random empty cell, returning where it
    /// landed.
    pub fn place_random(&mut self, entity: Entity) -> Result<Position, BoardError> {
        let position = self.random_empty_position()?;
        self.place(position, entity)?;
        Ok(position)
    }
}

/// Applies the provided command to the board, reporting the outcome as
/// events.
///
/// Every failure emits exactly one [`Event::Rejected`]. Removing a player is
/// a silent no-op.
pub fn apply<G: EventGate>(board: &mut Board<G>, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Place { position, entity } => match board.place(position, entity) {
            Ok(()) => out_events.push(Event::EntitySpawned { position, entity }),
            Err(reason) => out_events.push(Event::Rejected { reason }),
        },
        Command::PlaceRandom { entity } => match board.place_random(entity) {
            Ok(position) => out_events.push(Event::EntitySpawned { position, entity }),
            Err(reason) => out_events.push(Event::Rejected { reason }),
        },
        Command::Replace { position, entity } => {
            let outcome = board.replace(position, entity);
            report_replacement(position, entity, outcome, out_events);
        }
        Command::Remove { position } => match board.get(position) {
            Ok(Some(occupant)) if occupant.is_player() => {}
            Ok(_) => {
                let outcome = board.remove(position);
                report_replacement(position, None, outcome, out_events);
            }
            Err(reason) => out_events.push(Event::Rejected { reason }),
        },
    }
}

fn report_replacement(
    position: Position,
    current: Option<Entity>,
    outcome: Result<Option<Entity>, BoardError>,
    out_events: &mut Vec<Event>,
) {
    match outcome {
        Ok(previous) => {
            if let Some(enemy) = previous.as_ref().and_then(Entity::as_enemy) {
                out_events.push(Event::EnemyDied {
                    position,
                    enemy: *enemy,
                });
            }
            if previous != current {
                out_events.push(Event::CellChanged {
                    position,
                    previous,
                    current,
                });
            }
        }
        Err(reason) => out_events.push(Event::Rejected { reason }),
    }
}
