#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Listener dispatch for board mutation events.
//!
//! [`Dispatcher`] implements [`EventGate`] by wrapping each gate call in a
//! cancellable event and offering it to every registered [`Listener`] in
//! registration order. Listeners see the decision taken so far and may
//! overturn it; whatever flag remains after the last listener is returned to
//! the board.

use std::fmt;

use log::trace;
use mapgame_core::{Enemy, Entity, EventGate, Position, Verdict};

/// Cancellable notification that an entity is about to spawn.
#[derive(Debug)]
pub struct EntitySpawn<'a> {
    entity: &'a Entity,
    position: Position,
    cancelled: bool,
}

impl<'a> EntitySpawn<'a> {
    /// Entity about to be written.
    #[must_use]
    pub fn entity(&self) -> &'a Entity {
        self.entity
    }

    /// Empty cell the entity is about to occupy.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Reports whether a listener has cancelled the spawn so far.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Cancels or reinstates the spawn.
    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

/// Cancellable notification that an enemy is about to die.
#[derive(Debug)]
pub struct EnemyDeath<'a> {
    position: Position,
    enemy: &'a Enemy,
    cancelled: bool,
}

impl<'a> EnemyDeath<'a> {
    /// Cell the enemy occupies.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Enemy about to be cleared or overwritten.
    #[must_use]
    pub fn enemy(&self) -> &'a Enemy {
        self.enemy
    }

    /// Reports whether a listener has cancelled the death so far.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Cancels or reinstates the death.
    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

/// Receiver of board mutation events. Both hooks default to doing nothing.
pub trait Listener {
    /// Called before an entity spawns.
    fn on_entity_spawn(&mut self, _event: &mut EntitySpawn<'_>) {}

    /// Called before an enemy dies.
    fn on_enemy_death(&mut self, _event: &mut EnemyDeath<'_>) {}
}

/// Ordered collection of listeners acting as the board's gate.
#[derive(Default)]
pub struct Dispatcher {
    listeners: Vec<Box<dyn Listener>>,
}

impl Dispatcher {
    /// Creates a dispatcher without listeners, which allows everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener; it runs after every listener registered before it.
    pub fn register<L>(&mut self, listener: L)
    where
        L: Listener + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Reports whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventGate for Dispatcher {
    fn on_entity_spawn(&mut self, entity: &Entity, position: Position) -> Verdict {
        trace!(
            "offering spawn of {entity:?} at {position} to {} listeners",
            self.listeners.len()
        );
        let mut event = EntitySpawn {
            entity,
            position,
            cancelled: false,
        };
        for listener in &mut self.listeners {
            listener.on_entity_spawn(&mut event);
        }
        Verdict::from_cancelled(event.cancelled)
    }

    fn on_enemy_death(&mut self, position: Position, enemy: &Enemy) -> Verdict {
        trace!(
            "offering death of enemy {} at {position} to {} listeners",
            enemy.id().get(),
            self.listeners.len()
        );
        let mut event = EnemyDeath {
            position,
            enemy,
            cancelled: false,
        };
        for listener in &mut self.listeners {
            listener.on_enemy_death(&mut event);
        }
        Verdict::from_cancelled(event.cancelled)
    }
}
