#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a seeded session on the map game board.

mod play;
mod session;

use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};

use crate::session::{Args, SessionConfig};

/// Entry point for the map game command-line interface.
fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let session = SessionConfig::resolve(&Args::parse())?;
    let summary = play::play(&session)?;

    print!("{}", summary.board);
    println!(
        "{} turns played, {} enemies fell",
        summary.turns_played, summary.deaths
    );
    for (tag, count) in &summary.census {
        println!("{tag:?}: {count}");
    }
    Ok(())
}
