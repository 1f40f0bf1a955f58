//! # Chain Engine
//!
//! Orchestrates the ledger: block construction, height derivation, hash
//! linkage, persistence, and integrity verification. This is the only
//! module that writes blocks; everything else is a collaborator.
//!
//! ## Append Flow
//!
//! ```text
//! append_block(body)
//!   ├── next_height  = count of stored records   (O(N) key scan)
//!   ├── time         = now (Unix seconds)
//!   ├── prev link    = hash of block next_height-1   (when height > 0)
//!   ├── hash         = SHA-256 over canonical serialization
//!   └── put(next_height, block)                  (atomic, flushed)
//! ```
//!
//! Validation runs the same pipeline in reverse: read, re-hash, compare.
//!
//! ## Concurrency
//!
//! There is exactly one logical writer. The read-height → compute-link →
//! write sequence is not atomic against the store, so two interleaved
//! appends could observe the same height and overwrite each other's block.
//! `Chain` therefore serializes all appends through an internal mutex;
//! `append_block` completes — success or error — before returning, never
//! fire-and-forget. Reads take no lock: a store put lands a whole record
//! atomically, so a concurrent reader observes the chain either before or
//! after an append, never a torn block.
//!
//! ## Height Derivation
//!
//! Chain length is derived by enumerating store keys on every query. That
//! is an O(N) scan, and it is intentional: the store stays the sole source
//! of truth, and no in-memory counter can drift from what is actually on
//! disk.

use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

use crate::block::Block;
use crate::config;
use crate::store::{ChainStore, StoreError};

// ---------------------------------------------------------------------------
// Error Type
// ---------------------------------------------------------------------------

/// Errors surfaced by chain operations.
///
/// A failed validation is NOT an error — it is a normal `false` / defect
/// outcome. Errors here mean the operation itself could not run.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// The store failed underneath us. Propagated as-is, never retried.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No block exists at the requested height.
    #[error("no block at height {height}")]
    NotFound { height: u64 },
}

pub type ChainResult<T> = Result<T, ChainError>;

// ---------------------------------------------------------------------------
// ChainAudit
// ---------------------------------------------------------------------------

/// Outcome of a full-chain integrity audit.
///
/// Carries every defective height, in ascending order, one entry per
/// height — whether the hash check, the link check, or both failed there.
/// The boolean answer is derived; the defect list is the contract, because
/// "your chain is broken" is useless without "at heights 3 and 17".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChainAudit {
    /// Heights at which integrity verification failed.
    pub defects: Vec<u64>,
}

impl ChainAudit {
    /// True iff no defect was found.
    pub fn is_valid(&self) -> bool {
        self.defects.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// The ledger engine. Owns block construction and persistence.
///
/// Constructed around an explicit [`ChainStore`] handle — there is no
/// ambient store and no hidden initialization. Share across threads via
/// `Arc<Chain>`; appends serialize internally, reads run concurrently.
#[derive(Debug)]
pub struct Chain {
    store: ChainStore,
    /// Serializes the append read-height → link → write critical section.
    append_lock: Mutex<()>,
}

impl Chain {
    /// Wrap a store handle in a chain engine.
    ///
    /// Does not touch the store; call [`Chain::initialize`] to create the
    /// genesis block on a fresh store.
    pub fn new(store: ChainStore) -> Self {
        Chain {
            store,
            append_lock: Mutex::new(()),
        }
    }

    /// The underlying store handle.
    pub fn store(&self) -> &ChainStore {
        &self.store
    }

    // -- Writes -------------------------------------------------------------

    /// Create the genesis block if the store is empty.
    ///
    /// Returns the freshly appended genesis block, or `None` if the chain
    /// already exists. Idempotent: the empty-check and the append happen
    /// under the append lock, so racing initializers cannot mint two
    /// genesis blocks.
    pub fn initialize(&self) -> ChainResult<Option<Block>> {
        let guard = self.append_lock.lock();
        if self.store.height_count()? > 0 {
            debug!("chain already initialized, skipping genesis");
            return Ok(None);
        }
        let genesis = self.append_with_guard(
            serde_json::Value::String(config::GENESIS_BODY.to_string()),
            &guard,
        )?;
        info!(hash = %genesis.hash, "genesis block created");
        Ok(Some(genesis))
    }

    /// Append a new block carrying the given payload.
    ///
    /// Assigns the next height, the current timestamp, and the predecessor
    /// link, seals the block with its content hash, and persists it. The
    /// returned block is exactly what landed in the store.
    pub fn append_block(&self, body: serde_json::Value) -> ChainResult<Block> {
        let guard = self.append_lock.lock();
        self.append_with_guard(body, &guard)
    }

    /// The append critical section. Callers must hold the append lock —
    /// the guard parameter makes forgetting it a compile error.
    fn append_with_guard(
        &self,
        body: serde_json::Value,
        _guard: &MutexGuard<'_, ()>,
    ) -> ChainResult<Block> {
        let next_height = self.store.height_count()?;

        let mut block = Block::new(body);
        block.height = next_height;
        block.time = unix_time_secs();

        if next_height > 0 {
            let prev = self.block(next_height - 1)?;
            block.previous_block_hash = prev.hash;
        }

        block.hash = block.compute_hash();
        self.store.put(next_height, &block)?;

        debug!(height = block.height, hash = %block.hash, "block appended");
        Ok(block)
    }

    // -- Reads --------------------------------------------------------------

    /// Height of the most recently appended block, or `None` on an empty
    /// chain.
    ///
    /// Derived from the store's record count on every call — see the
    /// module docs on height derivation.
    pub fn block_height(&self) -> ChainResult<Option<u64>> {
        let count = self.store.height_count()?;
        Ok(count.checked_sub(1))
    }

    /// Fetch the block at the given height.
    pub fn block(&self, height: u64) -> ChainResult<Block> {
        self.store
            .get(height)?
            .ok_or(ChainError::NotFound { height })
    }

    /// Lazily enumerate all blocks in ascending height order.
    ///
    /// Each call starts a fresh enumeration; the iterator never mutates
    /// the chain.
    pub fn view_chain(&self) -> impl Iterator<Item = ChainResult<Block>> {
        self.store.records().map(|record| -> ChainResult<Block> {
            let (_, block) = record?;
            Ok(block)
        })
    }

    // -- Validation ---------------------------------------------------------

    /// Check a single block's content hash.
    ///
    /// Re-hashes the stored block with its `hash` field blanked and
    /// compares against the stored digest. A mismatch is a normal `false`
    /// outcome, not an error; a missing height is `NotFound`.
    pub fn validate_block(&self, height: u64) -> ChainResult<bool> {
        let block = self.block(height)?;
        Ok(block.compute_hash() == block.hash)
    }

    /// Audit the whole chain.
    ///
    /// For every height: the content-hash check, and, from height 1 up,
    /// the link check against the predecessor's stored hash. The audit
    /// never stops at the first defect — the complete defect set comes
    /// back in one pass, so the full extent of any corruption is visible
    /// at once.
    pub fn validate_chain(&self) -> ChainResult<ChainAudit> {
        let count = self.store.height_count()?;
        let mut defects = Vec::new();
        let mut prev: Option<Block> = None;

        for height in 0..count {
            let block = self.block(height)?;

            let mut defective = block.compute_hash() != block.hash;
            if let Some(prev) = &prev {
                if prev.hash != block.previous_block_hash {
                    defective = true;
                }
            }

            if defective {
                defects.push(height);
            }
            prev = Some(block);
        }

        if !defects.is_empty() {
            warn!(defects = ?defects, "chain audit found defective heights");
        }
        Ok(ChainAudit { defects })
    }
}

/// Current wall-clock time as Unix seconds.
fn unix_time_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
