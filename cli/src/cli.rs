//! # CLI Interface
//!
//! Defines the command-line argument structure for the `sigil` binary using
//! `clap` derive. One subcommand per ledger operation, plus `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sigil — a minimal tamper-evident ledger.
///
/// Owns a local block store, appends hash-linked blocks to it, and
/// re-verifies the whole chain on demand. No network, no consensus:
/// one writer, one store, one chain.
#[derive(Parser, Debug)]
#[command(
    name = "sigil",
    about = "Sigil tamper-evident ledger",
    version,
    propagate_version = true
)]
pub struct SigilCli {
    /// Path to the data directory where the block store lives.
    ///
    /// Created on first use if it does not exist.
    #[arg(
        long,
        short = 'd',
        env = "SIGIL_DATA_DIR",
        default_value = ".sigil",
        global = true
    )]
    pub data_dir: PathBuf,

    /// Log output format: "pretty" or "json".
    #[arg(long, env = "SIGIL_LOG_FORMAT", default_value = "pretty", global = true)]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the sigil binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the block store and create the genesis block.
    Init,
    /// Append a new block carrying the given payload.
    Append(AppendArgs),
    /// Print every block in the chain, in height order.
    Show,
    /// Fetch and print a single block by height.
    Block(BlockArgs),
    /// Print the current block height.
    Height,
    /// Re-verify the whole chain and report any defective heights.
    Validate,
    /// Print version information and exit.
    Version,
}

/// Arguments for the `append` subcommand.
#[derive(Parser, Debug)]
pub struct AppendArgs {
    /// Block payload. Parsed as JSON when it is valid JSON, otherwise
    /// stored as a plain JSON string.
    pub body: String,
}

/// Arguments for the `block` subcommand.
#[derive(Parser, Debug)]
pub struct BlockArgs {
    /// Height of the block to fetch.
    pub height: u64,
}
