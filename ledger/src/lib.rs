// Copyright (c) 2026 Sigil Contributors. MIT License.
// See LICENSE for details.

//! # Sigil — Core Ledger Library
//!
//! A minimal append-only, hash-linked ledger persisted in an ordered
//! key-value store. Every block commits to its predecessor's digest, so the
//! whole chain can be independently re-verified from nothing but the
//! records on disk.
//!
//! ## Architecture
//!
//! The crate mirrors the actual concerns of a tamper-evident ledger, leaves
//! first:
//!
//! - **hash** — The digest primitive (SHA-256, hex-encoded). A pure leaf.
//! - **store** — Ordered key-value persistence over sled. Knows bytes and
//!   heights, nothing about chain rules.
//! - **block** — The unit of record and its canonical serialization.
//! - **chain** — The engine: append, height derivation, validation. The
//!   only writer.
//! - **config** — Every constant, in one place.
//!
//! ## Design Philosophy
//!
//! 1. The store is the sole source of truth — chain length is derived from
//!    it, never cached beside it.
//! 2. One logical writer. Appends serialize; reads don't wait.
//! 3. A failed validation is data, not an error. Errors mean the check
//!    couldn't run; `false` means it ran and the chain is lying to you.
//!
//! ## Example
//!
//! ```
//! use sigil_ledger::{Chain, ChainStore};
//! use serde_json::json;
//!
//! let chain = Chain::new(ChainStore::open_temporary()?);
//! chain.initialize()?;
//! let block = chain.append_block(json!({"event": "first entry"}))?;
//! assert_eq!(block.height, 1);
//! assert!(chain.validate_chain()?.is_valid());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod block;
pub mod chain;
pub mod config;
pub mod hash;
pub mod store;

pub use block::Block;
pub use chain::{Chain, ChainAudit, ChainError, ChainResult};
pub use store::{ChainStore, StoreError, StoreResult};
