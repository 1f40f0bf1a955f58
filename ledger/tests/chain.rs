//! End-to-end integration tests for the Sigil ledger.
//!
//! These exercise the full lifecycle — store creation, genesis
//! initialization, sequential appends, height derivation, and both block-
//! and chain-level integrity verification, including tampering applied
//! directly to the store behind the engine's back.
//!
//! Each test stands alone with its own temporary store. No shared state,
//! no test ordering dependencies, no flaky failures.

use std::sync::Arc;
use std::thread;

use serde_json::json;

use sigil_ledger::{Block, Chain, ChainError, ChainResult, ChainStore};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// A chain over a fresh temporary store, genesis already in place.
fn initialized_chain() -> Chain {
    let chain = Chain::new(ChainStore::open_temporary().expect("temp store"));
    chain.initialize().expect("initialize");
    chain
}

/// Overwrite a stored block's body directly in the store, bypassing the
/// engine — the stored hash is left untouched so the forgery is stale.
fn tamper_body(chain: &Chain, height: u64, forged: serde_json::Value) {
    let mut block = chain.block(height).expect("block to tamper");
    block.body = forged;
    chain.store().put(height, &block).expect("tampered put");
}

// ---------------------------------------------------------------------------
// 1. Genesis
// ---------------------------------------------------------------------------

#[test]
fn genesis_is_first_block_in_the_chain() {
    let chain = initialized_chain();
    let genesis = chain.block(0).unwrap();

    assert_eq!(genesis.height, 0);
    assert_eq!(genesis.body, json!("First block in the chain - Genesis block"));
    assert_eq!(genesis.previous_block_hash, "");
}

#[test]
fn initialize_twice_never_produces_two_genesis_blocks() {
    let chain = initialized_chain();
    assert!(chain.initialize().unwrap().is_none());
    assert_eq!(chain.block_height().unwrap(), Some(0));

    // Still exactly one record, still the genesis payload.
    let blocks: Vec<Block> = chain.view_chain().collect::<ChainResult<_>>().unwrap();
    assert_eq!(blocks.len(), 1);
    assert!(blocks[0].is_genesis());
}

// ---------------------------------------------------------------------------
// 2. Appends & Height Derivation
// ---------------------------------------------------------------------------

#[test]
fn heights_are_contiguous_from_zero() {
    let chain = initialized_chain();
    for i in 0..20 {
        chain.append_block(json!({"seq": i})).unwrap();
    }

    // height of the tip + 1 == number of persisted records.
    let tip = chain.block_height().unwrap().expect("nonempty chain");
    let blocks: Vec<Block> = chain.view_chain().collect::<ChainResult<_>>().unwrap();
    assert_eq!(tip + 1, blocks.len() as u64);

    for (i, block) in blocks.iter().enumerate() {
        assert_eq!(block.height, i as u64);
    }
}

#[test]
fn append_a_then_b_scenario() {
    let chain = initialized_chain();
    chain.append_block(json!("A")).unwrap();
    chain.append_block(json!("B")).unwrap();

    assert_eq!(chain.block_height().unwrap(), Some(2));
    assert_eq!(
        chain.block(1).unwrap().previous_block_hash,
        chain.block(0).unwrap().hash
    );
    assert_eq!(
        chain.block(2).unwrap().previous_block_hash,
        chain.block(1).unwrap().hash
    );
    assert!(chain.validate_chain().unwrap().is_valid());
}

#[test]
fn link_invariant_holds_for_every_height() {
    let chain = initialized_chain();
    for i in 0..12 {
        chain.append_block(json!(i)).unwrap();
    }
    let tip = chain.block_height().unwrap().unwrap();
    for h in 1..=tip {
        assert_eq!(
            chain.block(h).unwrap().previous_block_hash,
            chain.block(h - 1).unwrap().hash,
            "link broken at height {h}"
        );
    }
}

#[test]
fn missing_height_surfaces_not_found() {
    let chain = initialized_chain();
    match chain.block(7) {
        Err(ChainError::NotFound { height }) => assert_eq!(height, 7),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// 3. Validation & Tamper Detection
// ---------------------------------------------------------------------------

#[test]
fn untouched_chain_validates_at_any_length() {
    for length in [0usize, 1, 2, 17] {
        let chain = initialized_chain();
        for i in 0..length {
            chain.append_block(json!(i)).unwrap();
        }
        let audit = chain.validate_chain().unwrap();
        assert!(audit.is_valid(), "clean chain of {length} appends flagged");
        assert!(audit.defects.is_empty());
    }
}

#[test]
fn single_appended_block_validates() {
    let chain = initialized_chain();
    let block = chain.append_block(json!("Random Block")).unwrap();
    assert!(chain.validate_block(block.height).unwrap());
}

#[test]
fn tampered_body_fails_block_validation() {
    let chain = initialized_chain();
    chain.append_block(json!("A")).unwrap();
    chain.append_block(json!("B")).unwrap();

    tamper_body(&chain, 1, json!("induced chain error"));

    assert!(!chain.validate_block(1).unwrap());
    let audit = chain.validate_chain().unwrap();
    assert!(!audit.is_valid());
    assert!(audit.defects.contains(&1));
}

#[test]
fn tampering_any_field_breaks_the_block() {
    let chain = initialized_chain();
    chain.append_block(json!("target")).unwrap();

    // Each mutation bypasses the engine and keeps the stale stored hash.
    let pristine = chain.block(1).unwrap();

    let mut bad_time = pristine.clone();
    bad_time.time += 60;
    chain.store().put(1, &bad_time).unwrap();
    assert!(!chain.validate_block(1).unwrap());

    let mut bad_link = pristine.clone();
    bad_link.previous_block_hash = "00".repeat(32);
    chain.store().put(1, &bad_link).unwrap();
    assert!(!chain.validate_block(1).unwrap());

    let mut bad_height = pristine.clone();
    bad_height.height = 5;
    chain.store().put(1, &bad_height).unwrap();
    assert!(!chain.validate_block(1).unwrap());

    // Restoring the pristine record restores validity.
    chain.store().put(1, &pristine).unwrap();
    assert!(chain.validate_block(1).unwrap());
}

#[test]
fn audit_reports_the_complete_defect_set() {
    let chain = initialized_chain();
    for i in 0..6 {
        chain.append_block(json!(i)).unwrap();
    }

    tamper_body(&chain, 2, json!("forged"));
    tamper_body(&chain, 5, json!("also forged"));

    // The audit must not stop at height 2 — corruption at 5 must be
    // reported in the same pass.
    let audit = chain.validate_chain().unwrap();
    assert_eq!(audit.defects, vec![2, 5]);
}

#[test]
fn reseal_after_tampering_breaks_the_link_downstream() {
    let chain = initialized_chain();
    chain.append_block(json!("A")).unwrap();
    chain.append_block(json!("B")).unwrap();

    // A smarter forger re-seals the tampered block so its own hash check
    // passes. The successor's stored link now betrays the rewrite.
    let mut forged = chain.block(1).unwrap();
    forged.body = json!("rewritten history");
    forged.hash = forged.compute_hash();
    chain.store().put(1, &forged).unwrap();

    assert!(chain.validate_block(1).unwrap());
    let audit = chain.validate_chain().unwrap();
    assert_eq!(audit.defects, vec![2]);
}

// ---------------------------------------------------------------------------
// 4. Persistence
// ---------------------------------------------------------------------------

#[test]
fn chain_survives_store_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");

    {
        let chain = Chain::new(ChainStore::open(dir.path()).unwrap());
        chain.initialize().unwrap();
        chain.append_block(json!("durable")).unwrap();
    }

    let chain = Chain::new(ChainStore::open(dir.path()).unwrap());
    assert_eq!(chain.block_height().unwrap(), Some(1));
    assert_eq!(chain.block(1).unwrap().body, json!("durable"));
    assert!(chain.validate_chain().unwrap().is_valid());

    // Re-initializing an existing chain is a no-op.
    assert!(chain.initialize().unwrap().is_none());
}

// ---------------------------------------------------------------------------
// 5. Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_appends_serialize_cleanly() {
    let chain = Arc::new(initialized_chain());

    let handles: Vec<_> = (0..4)
        .map(|writer| {
            let chain = Arc::clone(&chain);
            thread::spawn(move || {
                for i in 0..5 {
                    chain
                        .append_block(json!({"writer": writer, "seq": i}))
                        .expect("append");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("writer thread should not panic");
    }

    // Genesis + 20 appends, contiguous, no overwrites, fully linked.
    assert_eq!(chain.block_height().unwrap(), Some(20));
    let audit = chain.validate_chain().unwrap();
    assert!(audit.is_valid(), "defects: {:?}", audit.defects);
}

#[test]
fn readers_run_alongside_a_writer() {
    let chain = Arc::new(initialized_chain());

    let writer = {
        let chain = Arc::clone(&chain);
        thread::spawn(move || {
            for i in 0..30 {
                chain.append_block(json!(i)).expect("append");
            }
        })
    };

    // Readers only ever observe sealed, internally-consistent blocks.
    let readers: Vec<_> = (0..3)
        .map(|_| {
            let chain = Arc::clone(&chain);
            thread::spawn(move || {
                for _ in 0..50 {
                    for block in chain.view_chain() {
                        let block = block.expect("read");
                        assert_eq!(block.compute_hash(), block.hash);
                    }
                }
            })
        })
        .collect();

    writer.join().expect("writer panicked");
    for reader in readers {
        reader.join().expect("reader panicked");
    }

    assert!(chain.validate_chain().unwrap().is_valid());
}
