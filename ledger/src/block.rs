//! # Block Structure
//!
//! A block is the unit of record in the Sigil ledger. Each block carries an
//! opaque payload, its position in the chain, and two digests: its own
//! content hash and the hash of its predecessor. The predecessor link is
//! what turns a pile of records into a tamper-evident chain.
//!
//! ## Block Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Block                                                   │
//! │  ├── hash: String                (hex SHA-256 of self)   │
//! │  ├── height: u64                 (position; store key)   │
//! │  ├── body: serde_json::Value     (opaque payload)        │
//! │  ├── time: u64                   (Unix seconds)          │
//! │  └── previous_block_hash: String ("" for genesis)        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Canonical Serialization
//!
//! The block hash is computed over the block's JSON serialization with the
//! `hash` field set to the empty string. serde serializes struct fields in
//! declaration order, so the field order above IS the canonical order —
//! identical on the write path (hashing a freshly built block) and the read
//! path (re-hashing a block deserialized from the store). That symmetry is
//! a correctness contract, not an implementation detail: if the two paths
//! ever serialized differently, honest blocks would become indistinguishable
//! from tampered ones. Reordering or renaming fields is a breaking change
//! to the record format.
//!
//! `Block` itself is a plain value object. Heights, timestamps, links, and
//! hashes are assigned by the chain engine; the entity only knows how to
//! serialize and hash itself.

use serde::{Deserialize, Serialize};

use crate::hash::sha256_hex;

/// One immutable ledger entry.
///
/// Field order is canonical — see the module docs before touching it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Hex SHA-256 digest of this block's canonical serialization,
    /// computed with this field held empty.
    pub hash: String,
    /// Zero-based position in the chain; also the store key.
    pub height: u64,
    /// Opaque caller-supplied payload. Any JSON value.
    pub body: serde_json::Value,
    /// Creation timestamp, Unix seconds. Assigned at append time.
    pub time: u64,
    /// Hex digest of the predecessor block. Empty for genesis.
    pub previous_block_hash: String,
}

impl Block {
    /// Construct a fresh, unsealed block around a payload.
    ///
    /// Everything except `body` starts at its zero value; the chain engine
    /// assigns `height`, `time`, and `previous_block_hash`, then seals the
    /// block by filling in `hash`.
    pub fn new(body: serde_json::Value) -> Self {
        Block {
            hash: String::new(),
            height: 0,
            body,
            time: 0,
            previous_block_hash: String::new(),
        }
    }

    /// Serialize this block into its canonical hash preimage: the JSON
    /// encoding with `hash` blanked.
    ///
    /// A `Block` always serializes — every field is a string, an integer,
    /// or a JSON value whose map keys are strings.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let preimage = Block {
            hash: String::new(),
            ..self.clone()
        };
        serde_json::to_vec(&preimage).unwrap_or_default()
    }

    /// Recompute this block's content hash from its canonical serialization.
    ///
    /// For a sealed, untampered block this reproduces `self.hash` exactly;
    /// the chain engine's validation is nothing more than that comparison.
    pub fn compute_hash(&self) -> String {
        sha256_hex(&self.canonical_bytes())
    }

    /// True for the height-0 block.
    pub fn is_genesis(&self) -> bool {
        self.height == 0
    }
}
