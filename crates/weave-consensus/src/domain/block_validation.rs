//! # Block Validation
//!
//! The ordered, fail-fast gate sequence deciding whether a candidate block
//! extends the chain. Cheap, decisive checks run first; the external
//! proof-of-work call is the single expensive gate and runs last, so its
//! cost is never spent on a block that is invalid for structural reasons.
//!
//! Every caller-supplied snapshot stays frozen: the two ledger passes
//! (reward transition, replay pool) each run on their own clone.

use shared_crypto::owner_address;
use shared_types::constants::{
    min_diff, CHUNK_SIZE, MAX_DIFF_STRING_LEN, MAX_NONCE_SIZE, MAX_PATH_SIZE, MAX_TAGS_SIZE,
};
use shared_types::{Block, BlockIndex, BlockTxsPairs, U512};
use tracing::{debug, info, warn};

use crate::config::ConsensusConfig;
use crate::ports::PowHasher;

use super::block_hash::{block_data_segment, compute_tx_root, indep_hash_from_segment, pow_input};
use super::block_index::compute_hash_list_merkle;
use super::difficulty::{next_cumulative_diff, poa_modified_diff, validate_difficulty};
use super::errors::BlockValidationError;
use super::poa::validate_poa;
use super::replay_pool::validate_block_txs;
use super::wallets::WalletLedger;

/// Structured validation result handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockValidationOutcome {
    /// Whether the block was accepted.
    pub accepted: bool,
    /// Human-readable reason; `"valid block"` on acceptance.
    pub reason: String,
    /// Height of the candidate block, where applicable.
    pub height: Option<u64>,
}

/// Validator over candidate blocks.
///
/// Holds only configuration: each call is an independent, deterministic
/// computation, so one validator may serve unrelated forks concurrently as
/// long as callers serialize per chain tip.
pub struct BlockValidator {
    config: ConsensusConfig,
}

impl BlockValidator {
    /// Create a validator with the given configuration.
    pub fn new(config: ConsensusConfig) -> Self {
        Self { config }
    }

    /// Create a validator with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ConsensusConfig::default())
    }

    /// Validate a candidate block, reporting the structured outcome.
    #[allow(clippy::too_many_arguments)]
    pub fn validate(
        &self,
        block: &Block,
        prev_block: &Block,
        block_index: &BlockIndex,
        wallets: &WalletLedger,
        block_txs_pairs: &BlockTxsPairs,
        pow: &dyn PowHasher,
    ) -> BlockValidationOutcome {
        match self.validate_block(block, prev_block, block_index, wallets, block_txs_pairs, pow) {
            Ok(()) => {
                info!(height = block.height, "block accepted");
                BlockValidationOutcome {
                    accepted: true,
                    reason: "valid block".to_string(),
                    height: Some(block.height),
                }
            }
            Err(reason) => {
                warn!(height = block.height, %reason, "block rejected");
                BlockValidationOutcome {
                    accepted: false,
                    reason: reason.to_string(),
                    height: Some(block.height),
                }
            }
        }
    }

    /// The gate sequence itself. The first failing gate returns its tagged
    /// reason; success means every gate passed.
    #[allow(clippy::too_many_arguments)]
    pub fn validate_block(
        &self,
        block: &Block,
        prev_block: &Block,
        block_index: &BlockIndex,
        wallets: &WalletLedger,
        block_txs_pairs: &BlockTxsPairs,
        pow: &dyn PowHasher,
    ) -> Result<(), BlockValidationError> {
        let mode = self.config.numeric_mode;

        // 1. Coarse staleness/future bound.
        let window = self.config.height_validation_window;
        if block.height > prev_block.height + window
            || block.height + window < prev_block.height
        {
            return Err(BlockValidationError::HeightOutOfWindow {
                height: block.height,
                previous_height: prev_block.height,
                window,
            });
        }

        // 2. Difficulty floor, and the decimal form must render the number.
        if block.diff < min_diff() {
            return Err(BlockValidationError::DifficultyBelowMinimum);
        }
        match U512::from_dec_str(&block.diff_string) {
            Ok(parsed) if parsed == block.diff => {}
            _ => return Err(BlockValidationError::InvalidDifficultyString),
        }

        // 3. Height continuity.
        if block.height != prev_block.height + 1 {
            return Err(BlockValidationError::InvalidPreviousHeight {
                expected: prev_block.height + 1,
                got: block.height,
            });
        }

        // 4. Chain linkage.
        if block.previous_block != prev_block.indep_hash {
            return Err(BlockValidationError::InvalidPreviousBlock);
        }

        // 5. Proof of access.
        if !validate_poa(
            &prev_block.indep_hash,
            prev_block.weave_size,
            block_index,
            &block.poa,
        ) {
            return Err(BlockValidationError::InvalidPoa);
        }

        // 6. Retarget schedule, then cumulative-difficulty accounting.
        validate_difficulty(block, prev_block, mode)?;
        if block.cumulative_diff != next_cumulative_diff(prev_block.cumulative_diff, block.diff)
        {
            return Err(BlockValidationError::InvalidCumulativeDiff);
        }

        // 7. Independent hash. The segment is kept for the PoW gate.
        let bds = block_data_segment(block);
        if indep_hash_from_segment(&bds, block) != block.indep_hash {
            return Err(BlockValidationError::InvalidIndepHash);
        }

        // 8. Ledger transition on a clone of the frozen snapshot.
        let mut ledger = wallets.clone_for_mutation();
        let transition =
            ledger.update_wallets_with_block_txs(block, prev_block.reward_pool, mode);
        if transition.new_pool != block.reward_pool {
            return Err(BlockValidationError::RewardPoolMismatch {
                expected: transition.new_pool,
                got: block.reward_pool,
            });
        }
        for tx in &block.txs {
            let sender = owner_address(&tx.owner);
            if ledger.is_wallet_invalid(&sender) {
                return Err(BlockValidationError::InvalidWallet(sender));
            }
        }

        // 9. Block field-size limits.
        check_block_field_sizes(block)?;

        // 10. Replay protection over a second fresh clone.
        validate_block_txs(
            &block.txs,
            block.diff,
            block.height,
            block.timestamp,
            wallets,
            block_txs_pairs,
            mode,
        )?;

        // 11. Transaction root.
        if compute_tx_root(&block.txs) != block.tx_root {
            return Err(BlockValidationError::InvalidTxRoot);
        }

        // 12. Weave accounting, all formats counted.
        let appended: u64 = block.txs.iter().map(|tx| tx.data_size).sum();
        let expected_weave = prev_block.weave_size + appended;
        if block.weave_size != expected_weave {
            return Err(BlockValidationError::InvalidWeaveSize {
                expected: expected_weave,
                got: block.weave_size,
            });
        }
        if block.block_size != appended {
            return Err(BlockValidationError::InvalidBlockSize {
                expected: appended,
                got: block.block_size,
            });
        }

        // 13. Block-index root.
        if block.hash_list_merkle != compute_hash_list_merkle(prev_block) {
            return Err(BlockValidationError::InvalidBlockIndexRoot);
        }

        // 14. Proof of work: the one external, potentially expensive call.
        let digest = pow.hash(block.height, &pow_input(&bds, &block.nonce));
        if digest != block.hash {
            return Err(BlockValidationError::InvalidPowHash);
        }
        let threshold = poa_modified_diff(block.diff, block.poa.option);
        if U512::from_big_endian(&digest) <= threshold {
            return Err(BlockValidationError::PowBelowDifficulty);
        }

        debug!(height = block.height, "all gates passed");
        Ok(())
    }
}

fn check_block_field_sizes(block: &Block) -> Result<(), BlockValidationError> {
    let tag_bytes: usize = block.tags.iter().map(|tag| tag.byte_len()).sum();
    let limits: [(&'static str, usize, usize); 6] = [
        ("nonce", block.nonce.len(), MAX_NONCE_SIZE),
        ("diff_string", block.diff_string.len(), MAX_DIFF_STRING_LEN),
        ("poa.tx_path", block.poa.tx_path.len(), MAX_PATH_SIZE),
        ("poa.data_path", block.poa.data_path.len(), MAX_PATH_SIZE),
        ("poa.chunk", block.poa.chunk.len(), CHUNK_SIZE),
        ("tags", tag_bytes, MAX_TAGS_SIZE),
    ];
    for (field, size, limit) in limits {
        if size > limit {
            return Err(BlockValidationError::FieldTooLarge { field, size, limit });
        }
    }
    Ok(())
}
