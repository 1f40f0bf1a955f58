//! # Chain Store
//!
//! The persistence layer for the Sigil ledger, built on sled's embedded
//! key-value store. All on-disk data flows through this module.
//!
//! ## Layout
//!
//! One sled tree, one record per block:
//!
//! | Tree     | Key               | Value         |
//! |----------|-------------------|---------------|
//! | `blocks` | `height` (8B BE)  | JSON(`Block`) |
//!
//! Heights are stored as big-endian u64 so that sled's lexicographic key
//! ordering matches numeric ordering — scans walk the chain in height order
//! with no sorting step.
//!
//! Record values are JSON rather than a binary codec: a block body is an
//! opaque `serde_json::Value`, which only round-trips through a
//! self-describing format. JSON also keeps the records inspectable with
//! nothing fancier than `strings`.
//!
//! ## Ownership
//!
//! `ChainStore` is an explicit handle — constructed once, passed to whoever
//! needs it. There is deliberately no global store and no lazy singleton;
//! if a component touches disk, its constructor says so.
//!
//! ## Atomicity
//!
//! A `put` writes one fully-serialized record in a single sled insert and
//! then flushes. Concurrent readers observe either the previous state or
//! the complete new record, never a torn block.

use sled::{Db, Tree};
use std::path::Path;

use crate::block::Block;
use crate::config;

// ---------------------------------------------------------------------------
// Error Type
// ---------------------------------------------------------------------------

/// Errors that can occur during store operations.
///
/// The store never retries internally; failures propagate to the caller
/// as-is.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("codec error: {0}")]
    Codec(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// ---------------------------------------------------------------------------
// ChainStore
// ---------------------------------------------------------------------------

/// Ordered key-value store adapter holding the block records.
///
/// Wraps a sled `Db` and exposes typed block accessors plus the ordered
/// enumeration the chain engine needs for height derivation and audits.
///
/// # Thread Safety
///
/// sled trees support lock-free concurrent reads and serialized writes, so
/// `ChainStore` clones (cheap handle copies) can be shared across threads
/// freely. Sequencing of *appends* is not the store's job — the chain
/// engine owns that.
#[derive(Debug, Clone)]
pub struct ChainStore {
    /// The underlying sled database handle.
    db: Db,
    /// Block records keyed by big-endian height.
    blocks: Tree,
}

impl ChainStore {
    /// Open or create a store at the given filesystem path.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// Create a temporary store that lives in memory and is cleaned up
    /// when dropped. Ideal for tests — no filesystem residue.
    pub fn open_temporary() -> StoreResult<Self> {
        let config = sled::Config::new().temporary(true);
        let db = config.open()?;
        Self::from_db(db)
    }

    /// Internal constructor: opens the blocks tree on an existing `Db`.
    fn from_db(db: Db) -> StoreResult<Self> {
        let blocks = db.open_tree(config::BLOCKS_TREE)?;
        Ok(Self { db, blocks })
    }

    // -- Record operations --------------------------------------------------

    /// Fetch and deserialize the record at the given height.
    ///
    /// Returns `None` if no record exists there.
    pub fn get(&self, height: u64) -> StoreResult<Option<Block>> {
        match self.blocks.get(encode_height(height))? {
            Some(bytes) => Ok(Some(decode_block(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Serialize and persist a record at the given height, then flush.
    ///
    /// The store is append-only by convention, not enforcement: it will
    /// happily overwrite a key. Keeping heights unique is the chain
    /// engine's invariant.
    pub fn put(&self, height: u64, block: &Block) -> StoreResult<()> {
        let bytes =
            serde_json::to_vec(block).map_err(|e| StoreError::Codec(e.to_string()))?;
        self.blocks.insert(encode_height(height), bytes)?;
        self.db.flush()?;
        Ok(())
    }

    // -- Ordered enumeration ------------------------------------------------

    /// Enumerate all record keys in ascending height order.
    pub fn heights(&self) -> impl Iterator<Item = StoreResult<u64>> {
        self.blocks.iter().keys().map(|res| -> StoreResult<u64> {
            let key = res?;
            decode_height(&key)
        })
    }

    /// Enumerate all `(height, block)` records in ascending height order.
    ///
    /// Lazy: records are read and decoded as the iterator advances. Each
    /// call starts a fresh enumeration.
    pub fn records(&self) -> impl Iterator<Item = StoreResult<(u64, Block)>> {
        self.blocks.iter().map(|res| -> StoreResult<(u64, Block)> {
            let (key, value) = res?;
            Ok((decode_height(&key)?, decode_block(&value)?))
        })
    }

    /// Count the records by enumerating every key.
    ///
    /// Deliberately O(N): the store is the sole source of truth for chain
    /// length, and nothing here caches it. Callers that need the count in
    /// a hot loop should rethink the loop, not this method.
    pub fn height_count(&self) -> StoreResult<u64> {
        let mut count = 0u64;
        for key in self.blocks.iter().keys() {
            key?;
            count += 1;
        }
        Ok(count)
    }

    // -- Maintenance --------------------------------------------------------

    /// Block until all pending writes are durable on disk.
    pub fn flush(&self) -> StoreResult<()> {
        self.db.flush()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Key / Value Codecs
// ---------------------------------------------------------------------------

/// Encode a height as a fixed-width big-endian key.
fn encode_height(height: u64) -> [u8; config::HEIGHT_KEY_LENGTH] {
    height.to_be_bytes()
}

/// Decode a big-endian key back into a height.
fn decode_height(bytes: &[u8]) -> StoreResult<u64> {
    let raw: [u8; config::HEIGHT_KEY_LENGTH] = bytes
        .try_into()
        .map_err(|_| StoreError::Codec(format!("invalid height key of {} bytes", bytes.len())))?;
    Ok(u64::from_be_bytes(raw))
}

/// Decode a stored record value into a `Block`.
fn decode_block(bytes: &[u8]) -> StoreResult<Block> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Codec(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
