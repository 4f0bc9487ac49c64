//! # EarnTask Runtime
//!
//! Host process for the EarnTask state & transaction engine.
//!
//! ## Startup Sequence
//!
//! 1. Read configuration from the environment
//! 2. Install the tracing subscriber
//! 3. Open the store over file persistence (seed state on first run or
//!    when the snapshot cannot be loaded)
//! 4. Serve the operator console until `quit`
//!
//! The console is the only caller; it drives the store exclusively through
//! its named operations.

mod config;
mod console;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use earntask_state::{JsonFilePersistence, StateStore};

use crate::config::RuntimeConfig;
use crate::console::{Console, Outcome};

fn main() -> Result<()> {
    let config = RuntimeConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_filter.clone()))
        .init();

    info!(data_dir = %config.data_dir.display(), strict = config.strict, "starting earntask runtime");

    let persistence = JsonFilePersistence::in_dir(&config.data_dir)
        .context("failed to prepare data directory")?;
    let store = StateStore::open(Box::new(persistence), config.store_config());
    let mut console = Console::new(store);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "EarnTask console ready. Type `help` for commands.")?;
    writeln!(out, "{}", console.pending_summary())?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read input")?;
        match console.handle(&line) {
            Outcome::Reply(reply) => {
                if !reply.is_empty() {
                    writeln!(out, "{reply}")?;
                }
            }
            Outcome::Quit => break,
        }
        write!(out, "> ")?;
        out.flush()?;
    }

    info!("earntask runtime shutting down");
    Ok(())
}
