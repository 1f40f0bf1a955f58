// Copyright (c) 2026 Sigil Contributors. MIT License.
// See LICENSE for details.

//! # Sigil CLI
//!
//! Entry point for the `sigil` binary. Parses arguments, initializes
//! logging, opens the block store under the data directory, and dispatches
//! to the ledger engine.
//!
//! The binary supports seven subcommands:
//!
//! - `init`     — create the store and the genesis block
//! - `append`   — append a block carrying a payload
//! - `show`     — print the whole chain in height order
//! - `block`    — print one block by height
//! - `height`   — print the current block height
//! - `validate` — re-verify the whole chain, exit non-zero on defects
//! - `version`  — print build version information

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::Path;

use sigil_ledger::{Chain, ChainStore};

use cli::{Commands, SigilCli};
use logging::LogFormat;

fn main() -> Result<()> {
    let args = SigilCli::parse();
    logging::init_logging(
        "sigil=info,sigil_ledger=info",
        LogFormat::from_str_lossy(&args.log_format),
    );

    match args.command {
        Commands::Init => init(&args.data_dir),
        Commands::Append(append_args) => append(&args.data_dir, &append_args.body),
        Commands::Show => show(&args.data_dir),
        Commands::Block(block_args) => block(&args.data_dir, block_args.height),
        Commands::Height => height(&args.data_dir),
        Commands::Validate => validate(&args.data_dir),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Opens (creating if necessary) the block store under `data_dir` and wraps
/// it in a chain engine.
fn open_chain(data_dir: &Path) -> Result<Chain> {
    let db_path = data_dir.join("db");
    std::fs::create_dir_all(&db_path)
        .with_context(|| format!("failed to create data directory: {}", db_path.display()))?;

    let store = ChainStore::open(&db_path)
        .with_context(|| format!("failed to open block store at {}", db_path.display()))?;
    tracing::debug!(path = %db_path.display(), "block store opened");
    Ok(Chain::new(store))
}

/// Initializes the data directory and creates the genesis block.
fn init(data_dir: &Path) -> Result<()> {
    let chain = open_chain(data_dir)?;

    match chain.initialize()? {
        Some(genesis) => {
            println!("Ledger initialized.");
            println!("  Data directory : {}", data_dir.display());
            println!("  Genesis hash   : {}", genesis.hash);
        }
        None => {
            let tip = chain.block_height()?.unwrap_or(0);
            println!("Ledger already initialized (height {tip}).");
        }
    }
    Ok(())
}

/// Appends a block. Initializes the chain first if the store is empty, so
/// the first user-visible block always sits on top of a genesis block.
fn append(data_dir: &Path, raw_body: &str) -> Result<()> {
    let chain = open_chain(data_dir)?;
    chain.initialize()?;

    let block = chain.append_block(parse_body(raw_body))?;
    tracing::info!(height = block.height, hash = %block.hash, "block appended");
    println!("{}", serde_json::to_string_pretty(&block)?);
    Ok(())
}

/// Prints every block in the chain, in height order.
fn show(data_dir: &Path) -> Result<()> {
    let chain = open_chain(data_dir)?;

    let mut count = 0u64;
    for block in chain.view_chain() {
        let block = block?;
        println!("{}", serde_json::to_string_pretty(&block)?);
        count += 1;
    }
    if count == 0 {
        println!("(empty chain — run `sigil init` first)");
    }
    Ok(())
}

/// Prints the block at the given height.
fn block(data_dir: &Path, height: u64) -> Result<()> {
    let chain = open_chain(data_dir)?;
    let block = chain.block(height)?;
    println!("{}", serde_json::to_string_pretty(&block)?);
    Ok(())
}

/// Prints the current block height.
fn height(data_dir: &Path) -> Result<()> {
    let chain = open_chain(data_dir)?;
    match chain.block_height()? {
        Some(tip) => println!("{tip}"),
        None => println!("(empty chain — no blocks yet)"),
    }
    Ok(())
}

/// Re-verifies the whole chain. Exits non-zero when any height is
/// defective; the complete defect set is printed either way.
fn validate(data_dir: &Path) -> Result<()> {
    let chain = open_chain(data_dir)?;
    let blocks = chain.block_height()?.map(|tip| tip + 1).unwrap_or(0);
    let audit = chain.validate_chain()?;

    if audit.is_valid() {
        println!("chain valid ({blocks} blocks, no defects)");
        Ok(())
    } else {
        println!("chain INVALID — defective heights: {:?}", audit.defects);
        bail!("chain validation failed at {} height(s)", audit.defects.len());
    }
}

/// Prints version information to stdout.
fn print_version() {
    println!("sigil  {}", env!("CARGO_PKG_VERSION"));
    println!("ledger {}", sigil_ledger::config::LEDGER_VERSION);
    println!("digest {}", sigil_ledger::config::HASH_FUNCTION);
}

/// Interprets a raw payload argument: valid JSON passes through as-is,
/// anything else becomes a JSON string. `append '"quoted"'` and
/// `append plain` therefore both do what the caller meant.
fn parse_body(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_body_accepts_json() {
        assert_eq!(parse_body("{\"k\": 1}"), json!({"k": 1}));
        assert_eq!(parse_body("[1, 2]"), json!([1, 2]));
        assert_eq!(parse_body("42"), json!(42));
        assert_eq!(parse_body("\"quoted\""), json!("quoted"));
    }

    #[test]
    fn parse_body_falls_back_to_string() {
        assert_eq!(parse_body("plain words"), json!("plain words"));
        assert_eq!(parse_body("{not json"), json!("{not json"));
    }

    #[test]
    fn append_initializes_then_appends() {
        let dir = tempfile::tempdir().expect("tempdir");
        append(dir.path(), "first entry").expect("append");

        let chain = open_chain(dir.path()).expect("reopen");
        assert_eq!(chain.block_height().unwrap(), Some(1));
        assert_eq!(chain.block(1).unwrap().body, json!("first entry"));
        assert!(chain.block(0).unwrap().is_genesis());
    }

    #[test]
    fn validate_fails_on_tampered_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        append(dir.path(), "honest").expect("append");

        {
            let chain = open_chain(dir.path()).expect("open");
            let mut forged = chain.block(1).unwrap();
            forged.body = json!("forged");
            chain.store().put(1, &forged).unwrap();
        }

        assert!(validate(dir.path()).is_err());
    }
}
