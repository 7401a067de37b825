use crate::digest::{block_digest, canonical_timestamp, truncate_to_millis};
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};

/// Message carried by block 0.
pub const GENESIS_MESSAGE: &str = "Genesis Block";
/// Sentinel previous-hash value of block 0.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// One immutable, hash-committed record in the ledger.
///
/// Serialized with camelCase field names (`index`, `timestamp`,
/// `messageHash`, `previousHash`, `message`) for compatibility with
/// existing consumers of the chain.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Sequential position in the chain, starting at 0.
    pub index: u64,
    /// Creation time, UTC, millisecond precision.
    #[serde(with = "canonical_time")]
    pub timestamp: DateTime<Utc>,
    /// Content hash of this block; the value the next block links to.
    pub message_hash: String,
    /// Content hash of the preceding block (`"0"` for genesis).
    pub previous_hash: String,
    /// Text payload.
    pub message: String,
}

impl Block {
    /// Recompute this block's content digest from its stored fields.
    pub fn content_digest(&self) -> String {
        block_digest(self.index, &self.timestamp, &self.message, &self.previous_hash)
    }
}

/// Serialize block timestamps in their canonical text form so the wire
/// representation is byte-identical to what the digest commits to.
mod canonical_time {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&canonical_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> std::result::Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// The append-only message ledger.
///
/// Owns the full ordered chain exclusively; callers only ever see blocks by
/// value or through shared references. Constructed explicitly and handed to
/// whichever layer needs it (no process-global instance), so tests can use
/// fresh, isolated ledgers.
#[derive(Debug, Clone)]
pub struct Ledger {
    blocks: Vec<Block>,
}

impl Ledger {
    /// Create a new ledger seeded with the genesis block.
    pub fn new() -> Self {
        Ledger {
            blocks: vec![Self::create_genesis_block()],
        }
    }

    fn create_genesis_block() -> Block {
        let timestamp = truncate_to_millis(Utc::now());
        // Genesis stores a real digest; the "0" sentinel is previous_hash only.
        let message_hash = block_digest(0, &timestamp, GENESIS_MESSAGE, GENESIS_PREVIOUS_HASH);
        Block {
            index: 0,
            timestamp,
            message_hash,
            previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
            message: GENESIS_MESSAGE.to_string(),
        }
    }

    /// The most recently appended block.
    pub fn tip(&self) -> &Block {
        // The chain is never empty: genesis is created in `new` and blocks
        // are only ever pushed.
        self.blocks.last().expect("ledger always has a genesis block")
    }

    /// Number of blocks in the chain (always >= 1).
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// A genesis-seeded ledger is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Read access to the chain in append order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Append a message as a new block and return it by value.
    ///
    /// Empty messages are rejected; any further content policy (length caps
    /// and the like) belongs to the caller. The `&mut` receiver makes the
    /// read-tip/digest/push sequence exclusive with other appends; callers
    /// that share a ledger across tasks wrap it in a write lock.
    pub fn append(&mut self, message: &str) -> Result<Block> {
        if message.is_empty() {
            return Err(LedgerError::EmptyMessage);
        }

        let tip = self.tip();
        let index = tip.index + 1;
        let previous_hash = tip.message_hash.clone();
        let timestamp = truncate_to_millis(Utc::now());
        let message_hash = block_digest(index, &timestamp, message, &previous_hash);

        let block = Block {
            index,
            timestamp,
            message_hash,
            previous_hash,
            message: message.to_string(),
        };

        self.blocks.push(block.clone());
        Ok(block)
    }

    /// Owned copy of the full chain in append order, genesis first.
    pub fn snapshot(&self) -> Vec<Block> {
        self.blocks.clone()
    }

    /// Check genesis shape, index continuity, linkage and digest
    /// reproducibility over the whole chain.
    pub fn validate(&self) -> Result<()> {
        super::validation::validate_chain(&self.blocks)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
