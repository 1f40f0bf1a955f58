//! Terminal tour of the Sigil ledger lifecycle.
//!
//! Walks through store creation, genesis initialization, a few appends,
//! a clean full-chain audit, and then deliberate tampering to show the
//! audit catching it. Output uses ANSI escape codes for readability.
//!
//! Run with:
//!   cargo run --example tour

use serde_json::json;

use sigil_ledger::{Chain, ChainStore};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

fn section(title: &str) {
    println!("\n{BOLD}{CYAN}== {title} =={RESET}");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    section("Opening a temporary store");
    let chain = Chain::new(ChainStore::open_temporary()?);
    println!("store open, {DIM}no records yet{RESET}");

    section("Initializing the chain");
    let genesis = chain.initialize()?.expect("fresh store");
    println!("genesis sealed: {DIM}{}{RESET}", genesis.hash);

    section("Appending three blocks");
    for payload in [json!("A"), json!({"transfer": 500}), json!([1, 2, 3])] {
        let block = chain.append_block(payload)?;
        println!(
            "height {BOLD}{}{RESET}  hash {DIM}{}…{RESET}  links to {DIM}{}…{RESET}",
            block.height,
            &block.hash[..16],
            &block.previous_block_hash[..16],
        );
    }

    section("Auditing the untouched chain");
    let audit = chain.validate_chain()?;
    println!(
        "{GREEN}valid{RESET} — {} blocks, defects: {:?}",
        chain.block_height()?.map(|tip| tip + 1).unwrap_or(0),
        audit.defects,
    );

    section("Tampering with block 2 behind the engine's back");
    let mut forged = chain.block(2)?;
    forged.body = json!({"transfer": 500_000});
    chain.store().put(2, &forged)?;
    println!("stored body rewritten, stale hash left in place");

    section("Auditing again");
    let audit = chain.validate_chain()?;
    println!(
        "{RED}invalid{RESET} — defective heights: {:?}",
        audit.defects
    );

    Ok(())
}
