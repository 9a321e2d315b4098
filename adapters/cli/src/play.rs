use std::{cell::Cell, rc::Rc};

use anyhow::Result;
use log::{debug, info, warn};
use mapgame_core::{
    BoardError, Enemy, EnemyId, Entity, Player, PlayerId, Position, SpecialObj, VariantTag,
};
use mapgame_system_listeners::{Dispatcher, EnemyDeath, EntitySpawn, Listener};
use mapgame_system_specials::{self as specials, Specials};
use mapgame_world::Board;

use crate::session::SessionConfig;

const SPECIALS_SEED_SALT: u64 = 0x5350_4543_4941_4c53;

/// Variant families reported in the closing census.
const CENSUS: [VariantTag; 4] = [
    VariantTag::Obstacle,
    VariantTag::Player,
    VariantTag::Enemy,
    VariantTag::SpecialObj,
];

/// Logs every gated event and counts the deaths that went through.
struct Chronicle {
    deaths: Rc<Cell<u32>>,
}

impl Listener for Chronicle {
    fn on_entity_spawn(&mut self, event: &mut EntitySpawn<'_>) {
        debug!("{} appears at {}", event.entity().glyph(), event.position());
    }

    fn on_enemy_death(&mut self, event: &mut EnemyDeath<'_>) {
        if !event.is_cancelled() {
            self.deaths.set(self.deaths.get() + 1);
            info!(
                "enemy {} falls at {}",
                event.enemy().id().get(),
                event.position()
            );
        }
    }
}

/// What a finished session leaves behind.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) board: String,
    pub(crate) census: Vec<(VariantTag, usize)>,
    pub(crate) deaths: u32,
    pub(crate) turns_played: u32,
}

/// Plays a full session described by `config`.
pub(crate) fn play(config: &SessionConfig) -> Result<Summary> {
    let deaths = Rc::new(Cell::new(0));
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(Chronicle {
        deaths: Rc::clone(&deaths),
    });

    let mut board = Board::with_config(config.board(), dispatcher)?;
    let mut specials = Specials::new(specials::Config::new(config.seed ^ SPECIALS_SEED_SALT));

    let player = Entity::from(Player::new(PlayerId::new(0)));
    let mut at = board.place_random(player)?;
    info!("player enters at {at}");

    for id in 0..config.enemies {
        match board.place_random(Entity::from(Enemy::new(EnemyId::new(id)))) {
            Ok(_) => {}
            Err(BoardError::NoSpaceAvailable) => {
                warn!("board is full after {id} enemies");
                break;
            }
            Err(error) => return Err(error.into()),
        }
    }

    let mut turns_played = 0;
    for turn in 0..config.turns {
        for kind in specials.roll() {
            match specials.spawn(&mut board, kind) {
                Ok(_) => {}
                Err(BoardError::NoSpaceAvailable) => break,
                Err(error) => return Err(error.into()),
            }
        }

        at = step(&mut board, player, at)?;
        turns_played = turn + 1;
    }

    let mut census = Vec::with_capacity(CENSUS.len());
    for tag in CENSUS {
        census.push((tag, board.objects_by_variant(tag)?.len()));
    }

    Ok(Summary {
        board: board.render(),
        census,
        deaths: deaths.get(),
        turns_played,
    })
}

/// Moves the player to a random neighbour when it is free or holds a special,
/// triggering the special on arrival. Returns the player's position afterwards.
fn step(board: &mut Board<Dispatcher>, player: Entity, at: Position) -> Result<Position> {
    let target = board.random_neighbor(at);
    let special: Option<SpecialObj> = match board.get(target) {
        Ok(None) => None,
        Ok(Some(Entity::Special(special))) => Some(*special),
        Ok(Some(_)) | Err(BoardError::OutOfBounds { .. }) => {
            debug!("player stays at {at}, {target} is blocked");
            return Ok(at);
        }
        Err(error) => return Err(error.into()),
    };

    let _ = board.replace(target, Some(player))?;
    let _ = board.replace(at, None)?;
    debug!("player moves {at} -> {target}");

    if let Some(special) = special {
        let outcome = specials::execute(&special, board, target)?;
        info!("{} triggered at {target}: {outcome:?}", special.kind().name());
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(size: u32, enemies: u32, turns: u32) -> SessionConfig {
        SessionConfig {
            size,
            seed: 17,
            enemies,
            turns,
        }
    }

    #[test]
    fn sessions_replay_from_the_same_seed() {
        let first = play(&config(8, 5, 12)).expect("session");
        let second = play(&config(8, 5, 12)).expect("session");
        assert_eq!(first, second);
        assert_eq!(first.turns_played, 12);
    }

    #[test]
    fn census_always_finds_the_player_and_the_wall() {
        let summary = play(&config(6, 3, 5)).expect("session");
        let count = |wanted: VariantTag| {
            summary
                .census
                .iter()
                .find_map(|&(tag, count)| (tag == wanted).then_some(count))
                .unwrap_or_default()
        };
        assert_eq!(count(VariantTag::Player), 1);
        assert!(count(VariantTag::Obstacle) >= 20);
        assert!(count(VariantTag::Enemy) + summary.deaths as usize <= 3);
        assert_eq!(summary.board.lines().count(), 6);
    }

    #[test]
    fn crowded_board_stops_placing_enemies() {
        let summary = play(&config(3, 4, 0)).expect("session");
        assert_eq!(summary.census[2], (VariantTag::Enemy, 0));
        assert_eq!(summary.census[1], (VariantTag::Player, 1));
    }

    #[test]
    fn zero_sized_board_is_reported() {
        assert!(play(&config(0, 0, 0)).is_err());
    }
}
