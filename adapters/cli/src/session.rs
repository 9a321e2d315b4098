use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use mapgame_world::BoardConfig;
use serde::Deserialize;

const DEFAULT_ENEMIES: u32 = 6;
const DEFAULT_TURNS: u32 = 20;

/// Command-line arguments. Every flag overrides the matching config file key.
#[derive(Debug, Parser)]
#[command(name = "mapgame", about = "Plays a seeded session on a walled tile board")]
pub(crate) struct Args {
    /// Side length of the square board, walls included.
    #[arg(long)]
    size: Option<u32>,
    /// Seed shared by every random draw of the session.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of enemies placed before the first turn.
    #[arg(long)]
    enemies: Option<u32>,
    /// Number of turns to play.
    #[arg(long)]
    turns: Option<u32>,
    /// TOML file providing defaults for the flags above.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Fully resolved session parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionConfig {
    pub(crate) size: u32,
    pub(crate) seed: u64,
    pub(crate) enemies: u32,
    pub(crate) turns: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let board = BoardConfig::default();
        Self {
            size: board.size(),
            seed: board.seed(),
            enemies: DEFAULT_ENEMIES,
            turns: DEFAULT_TURNS,
        }
    }
}

impl SessionConfig {
    /// Reads the optional config file and layers the flags on top of it.
    pub(crate) fn resolve(args: &Args) -> Result<Self> {
        let base = match &args.config {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed to read session config at {}", path.display()))?;
                Self::parse(&contents)
                    .with_context(|| format!("invalid session config at {}", path.display()))?
            }
            None => Self::default(),
        };
        Ok(base.overridden_by(args))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse session config toml contents")
    }

    fn overridden_by(self, args: &Args) -> Self {
        Self {
            size: args.size.unwrap_or(self.size),
            seed: args.seed.unwrap_or(self.seed),
            enemies: args.enemies.unwrap_or(self.enemies),
            turns: args.turns.unwrap_or(self.turns),
        }
    }

    /// Board parameters derived from the session.
    pub(crate) fn board(&self) -> BoardConfig {
        BoardConfig::new(self.size, self.seed)
    }
}
