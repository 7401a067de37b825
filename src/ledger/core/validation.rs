use crate::error::{LedgerError, Result};
use crate::ledger::core::chain::{Block, GENESIS_MESSAGE, GENESIS_PREVIOUS_HASH};

/// Validate a stored chain independent of how it was built.
///
/// Checks, in order: genesis shape (index 0, `"0"` previous hash, genesis
/// message), then per block: index continuity, linkage to the predecessor's
/// content hash, and digest reproducibility from the stored fields. Fails at
/// the first violated block, naming the violation and the block's zero-based
/// chain position (not its stored `index`, which may itself be tampered).
/// Detection only; a broken chain is never repaired.
pub fn validate_chain(blocks: &[Block]) -> Result<()> {
    let genesis = blocks
        .first()
        .ok_or_else(|| LedgerError::InvalidGenesis("chain is empty".to_string()))?;

    if genesis.index != 0 {
        return Err(LedgerError::InvalidGenesis(format!(
            "genesis index must be 0, got {}",
            genesis.index
        )));
    }
    if genesis.previous_hash != GENESIS_PREVIOUS_HASH {
        return Err(LedgerError::InvalidGenesis(format!(
            "genesis previous hash must be \"{}\", got \"{}\"",
            GENESIS_PREVIOUS_HASH, genesis.previous_hash
        )));
    }
    if genesis.message != GENESIS_MESSAGE {
        return Err(LedgerError::InvalidGenesis(format!(
            "genesis message must be \"{}\", got \"{}\"",
            GENESIS_MESSAGE, genesis.message
        )));
    }

    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            let prev = &blocks[i - 1];
            if block.index != prev.index + 1 {
                return Err(LedgerError::NonSequentialIndex {
                    index: i as u64,
                    expected: prev.index + 1,
                    got: block.index,
                });
            }
            if block.previous_hash != prev.message_hash {
                return Err(LedgerError::BrokenLinkage { index: i as u64 });
            }
        }
        if block.message_hash != block.content_digest() {
            return Err(LedgerError::DigestMismatch { index: i as u64 });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;

    fn chain_of(n: usize) -> Vec<Block> {
        let mut ledger = Ledger::new();
        for i in 0..n {
            ledger.append(&format!("message {}", i)).unwrap();
        }
        ledger.snapshot()
    }

    #[test]
    fn test_freshly_built_chain_is_valid() {
        assert!(validate_chain(&chain_of(0)).is_ok());
        assert!(validate_chain(&chain_of(5)).is_ok());
    }

    #[test]
    fn test_empty_chain_is_invalid() {
        assert!(matches!(
            validate_chain(&[]),
            Err(LedgerError::InvalidGenesis(_))
        ));
    }

    #[test]
    fn test_wrong_genesis_message() {
        let mut chain = chain_of(2);
        chain[0].message = "Not Genesis".to_string();
        assert!(matches!(
            validate_chain(&chain),
            Err(LedgerError::InvalidGenesis(_))
        ));
    }

    #[test]
    fn test_index_gap_detected() {
        let mut chain = chain_of(3);
        chain[2].index = 5;
        assert!(matches!(
            validate_chain(&chain),
            Err(LedgerError::NonSequentialIndex {
                index: 2,
                expected: 2,
                got: 5
            })
        ));
    }

    #[test]
    fn test_violations_report_chain_position_not_stored_index() {
        // Drop a block from the middle: at position 1 the stored index is 2.
        let mut chain = chain_of(3);
        chain.remove(1);
        assert_eq!(
            validate_chain(&chain),
            Err(LedgerError::NonSequentialIndex {
                index: 1,
                expected: 1,
                got: 2
            })
        );
    }

    #[test]
    fn test_broken_linkage_detected() {
        let mut chain = chain_of(3);
        chain[2].previous_hash = "deadbeef".to_string();
        assert!(matches!(
            validate_chain(&chain),
            Err(LedgerError::BrokenLinkage { index: 2 })
        ));
    }

    #[test]
    fn test_tampered_message_fails_at_that_block() {
        let mut chain = chain_of(4);
        chain[2].message = "rewritten history".to_string();
        // Linkage still holds (hashes were not recomputed), so the failure
        // is the digest check at block 2, not elsewhere.
        assert_eq!(
            validate_chain(&chain),
            Err(LedgerError::DigestMismatch { index: 2 })
        );
    }

    #[test]
    fn test_tampered_stored_hash_detected() {
        let mut chain = chain_of(3);
        chain[1].message_hash = "f".repeat(64);
        assert_eq!(
            validate_chain(&chain),
            Err(LedgerError::DigestMismatch { index: 1 })
        );
    }
}
