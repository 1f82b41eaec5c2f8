//! # In-Block Replay Protection
//!
//! Walks a candidate block's ordered transaction list with a ledger clone
//! and an in-block seen set, rejecting anchor and id reuse and enforcing
//! the block-level count and data budgets. The pass is inherently
//! sequential: each transaction's validity depends on the cumulative
//! effect of everything before it in the same block.

use std::collections::HashSet;

use shared_crypto::owner_address;
use shared_types::constants::{BLOCK_TX_COUNT_LIMIT, BLOCK_TX_DATA_SIZE_LIMIT};
use shared_types::{BlockTxsPairs, Transaction, H256, U512};
use tracing::debug;

use super::errors::ReplayPoolError;
use super::tx_validation::verify_tx;
use super::wallets::WalletLedger;
use crate::config::NumericMode;

/// Validate a block's transaction list against a frozen ledger snapshot
/// and the recent-block anchor window.
///
/// Short-circuits on the first failure; nothing is committed anywhere, the
/// internal ledger clone simply drops.
pub fn validate_block_txs(
    txs: &[Transaction],
    diff: U512,
    height: u64,
    timestamp: u64,
    wallets: &WalletLedger,
    block_txs_pairs: &BlockTxsPairs,
    mode: NumericMode,
) -> Result<(), ReplayPoolError> {
    if txs.len() > BLOCK_TX_COUNT_LIMIT {
        return Err(ReplayPoolError::TxCountExceeded {
            count: txs.len(),
            limit: BLOCK_TX_COUNT_LIMIT,
        });
    }

    let mut ledger = wallets.clone_for_mutation();
    let mut verified: HashSet<H256> = HashSet::new();
    let mut anchors_used: HashSet<Vec<u8>> = HashSet::new();
    let mut inline_bytes = 0u64;

    for tx in txs {
        if tx.format == 1 {
            inline_bytes += tx.data_size;
            if inline_bytes > BLOCK_TX_DATA_SIZE_LIMIT {
                return Err(ReplayPoolError::BlockDataSizeExceeded {
                    size: inline_bytes,
                    limit: BLOCK_TX_DATA_SIZE_LIMIT,
                });
            }
        }

        verify_tx(tx, diff, height, timestamp, &ledger, mode).map_err(|source| {
            debug!(id = ?&tx.id[..4], %source, "tx rejected in replay pass");
            ReplayPoolError::Tx { id: tx.id, source }
        })?;

        // Two txs may not chain off the same not-yet-committed anchor.
        if anchors_used.contains(&tx.last_tx) {
            return Err(ReplayPoolError::AnchorUsedInBlock(tx.id));
        }

        let sender = owner_address(&tx.owner);
        let chains_on_wallet = ledger
            .get(&sender)
            .map(|entry| entry.last_tx == tx.last_tx)
            .unwrap_or(false);

        if !chains_on_wallet {
            // Not the sender's recorded anchor: must name a recent block.
            if !block_txs_pairs.contains_key(&tx.last_tx) {
                return Err(ReplayPoolError::InvalidAnchor(tx.id));
            }
            if block_txs_pairs.values().any(|ids| ids.contains(&tx.id)) {
                return Err(ReplayPoolError::TxAlreadyMined(tx.id));
            }
            if verified.contains(&tx.id) {
                return Err(ReplayPoolError::TxAlreadyInBlock(tx.id));
            }
        }

        verified.insert(tx.id);
        anchors_used.insert(tx.last_tx.clone());
        ledger.apply_tx(tx);
    }

    Ok(())
}
