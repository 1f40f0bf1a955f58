//! # Ledger Configuration & Constants
//!
//! Every magic value in Sigil lives here. If you're hardcoding a constant
//! somewhere else, you're doing it wrong.
//!
//! Most of these are load-bearing: the tree name and key width define the
//! on-disk layout, and the genesis body is hashed into block 0 — change any
//! of them and every existing chain stops validating.

// ---------------------------------------------------------------------------
// Genesis
// ---------------------------------------------------------------------------

/// The fixed sentinel payload of the genesis block.
///
/// Hashed into block 0 on `initialize()`, so this string is effectively
/// part of the chain format. Editing it orphans every chain ever created
/// with the old value.
pub const GENESIS_BODY: &str = "First block in the chain - Genesis block";

// ---------------------------------------------------------------------------
// Storage Layout
// ---------------------------------------------------------------------------

/// Name of the sled tree holding block records.
pub const BLOCKS_TREE: &str = "blocks";

/// Store keys are block heights encoded as big-endian `u64` — 8 bytes,
/// always. Big-endian so that sled's lexicographic key order matches
/// numeric height order and range scans walk the chain in sequence.
pub const HEIGHT_KEY_LENGTH: usize = 8;

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// The digest primitive. Stated here for operators and log readers; the
/// code gets it from the `hash` module.
pub const HASH_FUNCTION: &str = "SHA-256";

/// Length of a hex-encoded digest string. 32 bytes, two hex chars each.
pub const HASH_HEX_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// Versioning
// ---------------------------------------------------------------------------

/// Library version, straight from the crate manifest.
pub const LEDGER_VERSION: &str = env!("CARGO_PKG_VERSION");
