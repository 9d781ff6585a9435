//! lockbox - developer CLI for knowledge-gated vaults
//!
//! Acts as a local ledger: vaults, a block clock and account balances live
//! in a JSON state file. Every mutating command executes at the next block
//! and then advances the clock to it.

use std::path::PathBuf;

use alloy_primitives::Address;
use clap::{ArgAction, Parser};
use eyre::{eyre, WrapErr};
use lockbox_core::HashAlgorithm;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod state;

use commands::Command;
use state::LedgerState;

/// lockbox - knowledge-gated value vaults
#[derive(Parser, Debug)]
#[command(name = "lockbox")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Ledger state file (defaults to <data dir>/lockbox/state.json)
    #[arg(long, global = true, env = "LOCKBOX_STATE")]
    state: Option<PathBuf>,

    /// Hash primitive for commitments (keccak256, sha256)
    #[arg(long, global = true, env = "LOCKBOX_HASH")]
    hash: Option<HashAlgorithm>,

    /// Caller address
    #[arg(long, global = true, env = "LOCKBOX_FROM")]
    from: Option<Address>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let path = cli
        .state
        .or_else(state::default_path)
        .ok_or_else(|| eyre!("no data directory found: pass --state or set LOCKBOX_STATE"))?;
    let mut ledger = LedgerState::load_or_init(&path, cli.hash)?;

    let outcome = commands::execute(cli.command, &mut ledger, cli.from)?;
    if outcome.changed {
        ledger
            .save(&path)
            .wrap_err_with(|| format!("failed to save ledger to {}", path.display()))?;
        tracing::debug!(path = %path.display(), height = ledger.block_height, "ledger saved");
    }

    let output =
        serde_json::to_string_pretty(&outcome.output).wrap_err("failed to encode output")?;
    println!("{output}");
    Ok(())
}
