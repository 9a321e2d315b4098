use std::{cell::RefCell, rc::Rc};

use mapgame_core::{BoardError, Enemy, EnemyId, Entity, Position, VariantTag};
use mapgame_system_listeners::{Dispatcher, EnemyDeath, EntitySpawn, Listener};
use mapgame_world::Board;

type Journal = Rc<RefCell<Vec<String>>>;

/// Records every event it sees together with the cancellation state so far.
struct Recorder {
    name: &'static str,
    journal: Journal,
}

impl Listener for Recorder {
    fn on_entity_spawn(&mut self, event: &mut EntitySpawn<'_>) {
        self.journal.borrow_mut().push(format!(
            "{} spawn {} {} cancelled={}",
            self.name,
            event.entity().glyph(),
            event.position(),
            event.is_cancelled()
        ));
    }

    fn on_enemy_death(&mut self, event: &mut EnemyDeath<'_>) {
        self.journal.borrow_mut().push(format!(
            "{} death {} {} cancelled={}",
            self.name,
            event.enemy().id().get(),
            event.position(),
            event.is_cancelled()
        ));
    }
}

/// Vetoes spawns of one variant family.
struct ForbidVariant(VariantTag);

impl Listener for ForbidVariant {
    fn on_entity_spawn(&mut self, event: &mut EntitySpawn<'_>) {
        if self.0.matches(event.entity().tag()) {
            event.set_cancelled(true);
        }
    }
}

/// Keeps every enemy alive.
struct Immortal;

impl Listener for Immortal {
    fn on_enemy_death(&mut self, event: &mut EnemyDeath<'_>) {
        event.set_cancelled(true);
    }
}

/// Overturns any earlier decision about deaths.
struct Executioner;

impl Listener for Executioner {
    fn on_enemy_death(&mut self, event: &mut EnemyDeath<'_>) {
        event.set_cancelled(false);
    }
}

fn enemy(id: u32) -> Entity {
    Entity::from(Enemy::new(EnemyId::new(id)))
}

#[test]
fn listeners_run_in_registration_order_and_see_earlier_decisions() {
    let journal = Journal::default();
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(Recorder {
        name: "first",
        journal: Rc::clone(&journal),
    });
    dispatcher.register(ForbidVariant(VariantTag::Enemy));
    dispatcher.register(Recorder {
        name: "last",
        journal: Rc::clone(&journal),
    });

    let mut board = Board::new(5, dispatcher).expect("board");
    let position = Position::new(2, 2);
    assert_eq!(
        board.place(position, enemy(1)),
        Err(BoardError::SpawnCancelled { position })
    );
    assert!(board.is_empty(position).expect("in bounds"));

    assert_eq!(
        *journal.borrow(),
        vec![
            "first spawn E (2, 2) cancelled=false".to_owned(),
            "last spawn E (2, 2) cancelled=true".to_owned(),
        ]
    );
}

#[test]
fn unrelated_spawns_pass_the_filter() {
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(ForbidVariant(VariantTag::Enemy));
    let mut board = Board::new(5, dispatcher).expect("board");

    board
        .place(Position::new(1, 1), Entity::Obstacle)
        .expect("obstacles are allowed");
    assert_eq!(
        board.get(Position::new(1, 1)).expect("in bounds"),
        Some(&Entity::Obstacle)
    );
}

#[test]
fn vetoed_death_keeps_enemy_on_board() {
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(Immortal);
    let mut board = Board::new(5, dispatcher).expect("board");
    let position = Position::new(3, 3);
    board.place(position, enemy(2)).expect("place");

    assert_eq!(
        board.remove(position),
        Err(BoardError::DeathCancelled { position })
    );
    assert_eq!(board.get(position).expect("in bounds"), Some(&enemy(2)));
}

#[test]
fn later_listener_can_overturn_a_veto() {
    let journal = Journal::default();
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(Immortal);
    dispatcher.register(Recorder {
        name: "audit",
        journal: Rc::clone(&journal),
    });
    dispatcher.register(Executioner);
    let mut board = Board::new(5, dispatcher).expect("board");
    let position = Position::new(1, 2);
    board.place(position, enemy(4)).expect("place");

    assert_eq!(board.remove(position), Ok(Some(enemy(4))));
    assert!(board.is_empty(position).expect("in bounds"));
    assert_eq!(
        *journal.borrow(),
        vec![
            "audit spawn E (1, 2) cancelled=false".to_owned(),
            "audit death 4 (1, 2) cancelled=true".to_owned(),
        ]
    );
    assert_eq!(board.into_gate().len(), 3);
}
