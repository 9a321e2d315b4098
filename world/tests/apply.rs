use mapgame_core::{
    AllowAll, BoardError, Command, Enemy, EnemyId, Entity, Event, EventGate, Player, PlayerId,
    Position, Verdict,
};
use mapgame_world::{self as world, Board};

#[derive(Debug, Default)]
struct VetoDeaths;

impl EventGate for VetoDeaths {
    fn on_entity_spawn(&mut self, _entity: &Entity, _position: Position) -> Verdict {
        Verdict::Allow
    }

    fn on_enemy_death(&mut self, _position: Position, _enemy: &Enemy) -> Verdict {
        Verdict::Cancel
    }
}

fn enemy(id: u32) -> Enemy {
    Enemy::new(EnemyId::new(id))
}

#[test]
fn place_command_reports_spawn() {
    let mut board = Board::new(5, AllowAll).expect("board");
    let mut events = Vec::new();
    let position = Position::new(2, 1);
    let entity = Entity::from(enemy(0));

    world::apply(&mut board, Command::Place { position, entity }, &mut events);

    assert_eq!(events, vec![Event::EntitySpawned { position, entity }]);
    assert_eq!(board.get(position).expect("in bounds"), Some(&entity));
}

#[test]
fn place_command_on_wall_is_rejected() {
    let mut board = Board::new(5, AllowAll).expect("board");
    let mut events = Vec::new();
    let position = Position::new(0, 3);

    world::apply(
        &mut board,
        Command::Place {
            position,
            entity: Entity::Obstacle,
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::Rejected {
            reason: BoardError::OccupiedCell { position }
        }]
    );
}

#[test]
fn place_random_command_fills_then_rejects() {
    let mut board = Board::new(3, AllowAll).expect("board");
    let mut events = Vec::new();

    world::apply(
        &mut board,
        Command::PlaceRandom {
            entity: Entity::Obstacle,
        },
        &mut events,
    );
    world::apply(
        &mut board,
        Command::PlaceRandom {
            entity: Entity::Obstacle,
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![
            Event::EntitySpawned {
                position: Position::new(1, 1),
                entity: Entity::Obstacle,
            },
            Event::Rejected {
                reason: BoardError::NoSpaceAvailable,
            },
        ]
    );
}

#[test]
fn replacing_an_enemy_reports_death_and_change() {
    let mut board = Board::new(5, AllowAll).expect("board");
    let position = Position::new(1, 1);
    board.place(position, Entity::from(enemy(3))).expect("place");
    let mut events = Vec::new();

    world::apply(
        &mut board,
        Command::Replace {
            position,
            entity: Some(Entity::Obstacle),
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![
            Event::EnemyDied {
                position,
                enemy: enemy(3),
            },
            Event::CellChanged {
                position,
                previous: Some(Entity::from(enemy(3))),
                current: Some(Entity::Obstacle),
            },
        ]
    );
}

#[test]
fn vetoed_death_is_rejected_and_enemy_survives() {
    let mut board = Board::new(5, VetoDeaths).expect("board");
    let position = Position::new(1, 1);
    board.place(position, Entity::from(enemy(3))).expect("place");
    let mut events = Vec::new();

    world::apply(&mut board, Command::Remove { position }, &mut events);

    assert_eq!(
        events,
        vec![Event::Rejected {
            reason: BoardError::DeathCancelled { position }
        }]
    );
    assert_eq!(board.get(position).expect("in bounds"), Some(&Entity::from(enemy(3))));
}

#[test]
fn removing_a_player_is_silent() {
    let mut board = Board::new(5, AllowAll).expect("board");
    let position = Position::new(3, 3);
    let player = Entity::from(Player::new(PlayerId::new(0)));
    board.place(position, player).expect("place");
    let mut events = Vec::new();

    world::apply(&mut board, Command::Remove { position }, &mut events);

    assert!(events.is_empty());
    assert_eq!(board.get(position).expect("in bounds"), Some(&player));
}

#[test]
fn out_of_bounds_remove_is_rejected() {
    let mut board = Board::new(4, AllowAll).expect("board");
    let mut events = Vec::new();
    let position = Position::new(9, 9);

    world::apply(&mut board, Command::Remove { position }, &mut events);

    assert_eq!(
        events,
        vec![Event::Rejected {
            reason: BoardError::OutOfBounds { position, size: 4 }
        }]
    );
}
