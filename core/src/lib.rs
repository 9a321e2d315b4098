#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the map game.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative board, and pure systems. Game logic hands [`Entity`] values
//! to the board, the board consults an [`EventGate`] before committing a
//! spawn or an enemy death, and every mutation may alternatively be expressed
//! as a [`Command`] whose outcome is broadcast as [`Event`] values.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Immutable two-dimensional coordinate on the board.
///
/// Coordinates are signed so that neighbour arithmetic may step off the
/// board; bounds are validated by the board, never here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Creates a new position from column (`x`) and row (`y`) components.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column component of the position.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row component of the position.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the position translated by the provided deltas.
    #[must_use]
    pub const fn add(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.wrapping_add(dx), self.y.wrapping_add(dy))
    }

    /// Returns the axis-aligned neighbour lying in `direction`.
    #[must_use]
    pub const fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.add(dx, dy)
    }

    /// Enumerates the four axis-aligned neighbours in [`Direction::ALL`] order.
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        Direction::ALL
            .into_iter()
            .map(move |direction| self.offset(direction))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal directions connecting a cell with its axis-aligned neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction, clockwise from east.
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ];

    /// Column and row deltas applied when stepping in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Unique identifier assigned to a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a special object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpecialId(u32);

impl SpecialId {
    /// Creates a new special object identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// The controlled character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
}

impl Player {
    /// Creates a player carrying the provided identifier.
    #[must_use]
    pub const fn new(id: PlayerId) -> Self {
        Self { id }
    }

    /// Identifier that distinguishes this player from every other.
    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }
}

/// A hostile entity whose removal is reported as a death.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enemy {
    id: EnemyId,
}

impl Enemy {
    /// Creates an enemy carrying the provided identifier.
    #[must_use]
    pub const fn new(id: EnemyId) -> Self {
        Self { id }
    }

    /// Identifier that distinguishes this enemy from every other.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }
}

/// Concrete members of the special object family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialKind {
    /// Destroys the enemies standing next to the player.
    Bomb,
    /// Raises obstacles on the free cells around the player.
    Barrier,
}

impl SpecialKind {
    /// Every special kind in declaration order.
    pub const ALL: [SpecialKind; 2] = [SpecialKind::Bomb, SpecialKind::Barrier];

    /// Human readable name of the special object.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bomb => "bomb",
            Self::Barrier => "barrier",
        }
    }

    /// Probability in `[0, 1]` that the object spawns during a single roll.
    #[must_use]
    pub const fn spawn_weight(self) -> f64 {
        match self {
            Self::Bomb => 0.15,
            Self::Barrier => 0.25,
        }
    }

    /// Variant tag of the concrete kind.
    #[must_use]
    pub const fn tag(self) -> VariantTag {
        match self {
            Self::Bomb => VariantTag::Bomb,
            Self::Barrier => VariantTag::Barrier,
        }
    }
}

/// An item or effect that triggers when the player reaches it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpecialObj {
    id: SpecialId,
    kind: SpecialKind,
}

impl SpecialObj {
    /// Creates a special object of the provided kind.
    #[must_use]
    pub const fn new(id: SpecialId, kind: SpecialKind) -> Self {
        Self { id, kind }
    }

    /// Identifier that distinguishes this object from every other.
    #[must_use]
    pub const fn id(&self) -> SpecialId {
        self.id
    }

    /// Concrete kind of the object.
    #[must_use]
    pub const fn kind(&self) -> SpecialKind {
        self.kind
    }

    /// Probability in `[0, 1]` that the object spawns during a single roll.
    #[must_use]
    pub const fn spawn_weight(&self) -> f64 {
        self.kind.spawn_weight()
    }
}

/// Value stored in a board cell.
///
/// Obstacles are stateless and compare equal to one another. Players,
/// enemies and special objects compare by identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    /// Inert blocker, also used for the border wall.
    Obstacle,
    /// The controlled character.
    Player(Player),
    /// A hostile entity.
    Enemy(Enemy),
    /// An item or effect entity.
    Special(SpecialObj),
}

impl Entity {
    /// Single-character symbol used when rendering the board as text.
    #[must_use]
    pub const fn glyph(&self) -> char {
        match self {
            Self::Obstacle => '#',
            Self::Player(_) => 'P',
            Self::Enemy(_) => 'E',
            Self::Special(_) => '!',
        }
    }

    /// Concrete variant tag of the entity.
    #[must_use]
    pub const fn tag(&self) -> VariantTag {
        match self {
            Self::Obstacle => VariantTag::Obstacle,
            Self::Player(_) => VariantTag::Player,
            Self::Enemy(_) => VariantTag::Enemy,
            Self::Special(special) => special.kind.tag(),
        }
    }

    /// Reports whether the entity is a player.
    #[must_use]
    pub const fn is_player(&self) -> bool {
        matches!(self, Self::Player(_))
    }

    /// Returns the enemy payload when the entity is an enemy.
    #[must_use]
    pub const fn as_enemy(&self) -> Option<&Enemy> {
        match self {
            Self::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    /// Returns the special object payload when the entity is one.
    #[must_use]
    pub const fn as_special(&self) -> Option<&SpecialObj> {
        match self {
            Self::Special(special) => Some(special),
            _ => None,
        }
    }
}

impl From<Player> for Entity {
    fn from(player: Player) -> Self {
        Self::Player(player)
    }
}

impl From<Enemy> for Entity {
    fn from(enemy: Enemy) -> Self {
        Self::Enemy(enemy)
    }
}

impl From<SpecialObj> for Entity {
    fn from(special: SpecialObj) -> Self {
        Self::Special(special)
    }
}

/// Explicit variant hierarchy used by type-based board queries.
///
/// [`VariantTag::Entity`] is the root. Every other tag has exactly one
/// direct parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantTag {
    /// Root of the hierarchy, the parent of every top-level family.
    Entity,
    /// Inert blockers.
    Obstacle,
    /// Controlled characters.
    Player,
    /// Hostile entities.
    Enemy,
    /// Family of every special object kind.
    SpecialObj,
    /// Concrete [`SpecialKind::Bomb`] members.
    Bomb,
    /// Concrete [`SpecialKind::Barrier`] members.
    Barrier,
}

impl VariantTag {
    /// Direct parent of the tag, `None` for the root.
    #[must_use]
    pub const fn parent(self) -> Option<VariantTag> {
        match self {
            Self::Entity => None,
            Self::Obstacle | Self::Player | Self::Enemy | Self::SpecialObj => Some(Self::Entity),
            Self::Bomb | Self::Barrier => Some(Self::SpecialObj),
        }
    }

    /// Reports whether the tag is a direct child of [`VariantTag::Entity`].
    #[must_use]
    pub fn is_top_level(self) -> bool {
        self.parent() == Some(Self::Entity)
    }

    /// Reports whether an occupant carrying `occupant` satisfies a query for
    /// `self`: either the exact tag or its immediate family.
    #[must_use]
    pub fn matches(self, occupant: VariantTag) -> bool {
        occupant == self || occupant.parent() == Some(self)
    }
}

/// Decision returned by an [`EventGate`] about a pending mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Let the mutation proceed.
    Allow,
    /// Leave the board untouched.
    Cancel,
}

impl Verdict {
    /// Converts a cancellation flag into a verdict.
    #[must_use]
    pub const fn from_cancelled(cancelled: bool) -> Self {
        if cancelled {
            Self::Cancel
        } else {
            Self::Allow
        }
    }

    /// Reports whether the mutation was vetoed.
    #[must_use]
    pub const fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancel)
    }
}

/// External veto point the board consults before observable mutations.
///
/// Both hooks are invoked synchronously, exactly once per attempt, and
/// before the affected cell is written.
pub trait EventGate {
    /// Offered an entity about to be written into the empty cell at `position`.
    fn on_entity_spawn(&mut self, entity: &Entity, position: Position) -> Verdict;

    /// Offered an enemy about to be cleared or overwritten at `position`.
    fn on_enemy_death(&mut self, position: Position, enemy: &Enemy) -> Verdict;
}

impl<G: EventGate + ?Sized> EventGate for Box<G> {
    fn on_entity_spawn(&mut self, entity: &Entity, position: Position) -> Verdict {
        (**self).on_entity_spawn(entity, position)
    }

    fn on_enemy_death(&mut self, position: Position, enemy: &Enemy) -> Verdict {
        (**self).on_enemy_death(position, enemy)
    }
}

/// Gate that never vetoes anything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllowAll;

impl EventGate for AllowAll {
    fn on_entity_spawn(&mut self, _entity: &Entity, _position: Position) -> Verdict {
        Verdict::Allow
    }

    fn on_enemy_death(&mut self, _position: Position, _enemy: &Enemy) -> Verdict {
        Verdict::Allow
    }
}

/// Recoverable conditions reported by board operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum BoardError {
    /// The position lies outside the board in at least one axis.
    #[error("position {position} lies outside the {size}x{size} board")]
    OutOfBounds {
        /// Offending position.
        position: Position,
        /// Side length of the board.
        size: u32,
    },
    /// The board could not be built from the provided dimensions.
    #[error("board must be a non-empty square grid, got {rows} rows of {columns} columns")]
    InvalidDimensions {
        /// Number of rows supplied.
        rows: usize,
        /// Length of the first row that broke the square shape.
        columns: usize,
    },
    /// A placement targeted a cell that already holds an entity.
    #[error("cell {position} is already occupied")]
    OccupiedCell {
        /// Occupied position.
        position: Position,
    },
    /// The gate vetoed a spawn.
    #[error("spawn at {position} was cancelled")]
    SpawnCancelled {
        /// Position the entity would have occupied.
        position: Position,
    },
    /// The gate vetoed an enemy death.
    #[error("death of the enemy at {position} was cancelled")]
    DeathCancelled {
        /// Position of the surviving enemy.
        position: Position,
    },
    /// Random placement found no empty cell.
    #[error("no empty cell is available")]
    NoSpaceAvailable,
    /// An object query used a tag that is not a top-level family.
    #[error("{tag:?} is not a direct child of the entity root")]
    InvalidVariantQuery {
        /// Rejected tag.
        tag: VariantTag,
    },
}

impl BoardError {
    /// Cell the failure refers to, when it concerns a single cell.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        match self {
            Self::OutOfBounds { position, .. }
            | Self::OccupiedCell { position }
            | Self::SpawnCancelled { position }
            | Self::DeathCancelled { position } => Some(*position),
            Self::InvalidDimensions { .. }
            | Self::NoSpaceAvailable
            | Self::InvalidVariantQuery { .. } => None,
        }
    }
}

/// Commands that express all permissible board mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Places an entity into an empty cell.
    Place {
        /// Target cell.
        position: Position,
        /// Entity to spawn.
        entity: Entity,
    },
    /// Places an entity into a uniformly chosen empty cell.
    PlaceRandom {
        /// Entity to spawn.
        entity: Entity,
    },
    /// Unconditionally overwrites a cell, subject to enemy death vetoes.
    Replace {
        /// Target cell.
        position: Position,
        /// New content, `None` to clear the cell.
        entity: Option<Entity>,
    },
    /// Clears a cell unless it holds a player.
    Remove {
        /// Target cell.
        position: Position,
    },
}

/// Events broadcast by the board after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that an entity was written into a previously empty cell.
    EntitySpawned {
        /// Cell the entity now occupies.
        position: Position,
        /// Entity that spawned.
        entity: Entity,
    },
    /// Confirms that an enemy left the board through a replace or remove.
    EnemyDied {
        /// Cell the enemy occupied.
        position: Position,
        /// Enemy that died.
        enemy: Enemy,
    },
    /// Reports the before and after content of a replaced cell.
    CellChanged {
        /// Cell that changed.
        position: Position,
        /// Content prior to the change.
        previous: Option<Entity>,
        /// Content after the change.
        current: Option<Entity>,
    },
    /// Reports that a command left the board unchanged.
    Rejected {
        /// Specific reason the command failed.
        reason: BoardError,
    },
}
