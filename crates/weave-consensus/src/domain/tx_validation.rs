//! # Transaction Validation
//!
//! The per-transaction gate sequence: shape, identity, signature, fee
//! floor, tag budget, overspend simulation, and field-size limits. Pure
//! over its inputs; the wallet snapshot is only ever read or cloned.

use shared_crypto::{owner_address, sha256, verify_with_modulus};
use shared_types::constants::{
    MAX_AMOUNT_STRING_LEN, MAX_DATA_ROOT_SIZE, MAX_OWNER_SIZE, MAX_SIG_SIZE, MAX_TAGS_SIZE,
    MAX_TARGET_SIZE, MAX_TX_ANCHOR_SIZE, TX_DATA_SIZE_LIMIT,
};
use shared_types::{Address, Transaction, U512};

use crate::algorithms::deep_hash::{deep_hash, DeepHashChunk};
use crate::config::NumericMode;

use super::errors::TxValidationError;
use super::pricing::tx_fee;
use super::wallets::WalletLedger;

/// The canonical byte payload a transaction's signature covers.
///
/// # Panics
///
/// Panics on a format other than 1 or 2. Reaching this with an unsupported
/// format is a caller bug: [`verify_tx`] rejects such transactions before
/// any payload is computed.
pub fn signature_data(tx: &Transaction) -> Vec<u8> {
    match tx.format {
        1 => {
            let mut payload = Vec::new();
            payload.extend_from_slice(&tx.owner);
            payload.extend_from_slice(&tx.target);
            payload.extend_from_slice(&tx.data);
            payload.extend_from_slice(tx.quantity.to_string().as_bytes());
            payload.extend_from_slice(tx.reward.to_string().as_bytes());
            payload.extend_from_slice(&tx.last_tx);
            for tag in &tx.tags {
                payload.extend_from_slice(&tag.name);
                payload.extend_from_slice(&tag.value);
            }
            payload
        }
        2 => {
            let tags = tx
                .tags
                .iter()
                .map(|tag| {
                    DeepHashChunk::list(vec![
                        DeepHashChunk::blob(tag.name.clone()),
                        DeepHashChunk::blob(tag.value.clone()),
                    ])
                })
                .collect();
            deep_hash(&DeepHashChunk::list(vec![
                DeepHashChunk::blob(b"2".to_vec()),
                DeepHashChunk::blob(tx.owner.clone()),
                DeepHashChunk::blob(tx.target.clone()),
                DeepHashChunk::decimal(tx.quantity),
                DeepHashChunk::decimal(tx.reward),
                DeepHashChunk::blob(tx.last_tx.clone()),
                DeepHashChunk::List(tags),
                DeepHashChunk::decimal(tx.data_size as u128),
                DeepHashChunk::blob(tx.data_root.clone()),
            ]))
            .to_vec()
        }
        other => panic!(
            "unsupported transaction format {}: callers must validate the format first",
            other
        ),
    }
}

/// Validate one transaction against a frozen wallet snapshot.
///
/// `diff`, `height` and `timestamp` come from the block the transaction is
/// being considered for; they feed the fee floor.
pub fn verify_tx(
    tx: &Transaction,
    diff: U512,
    height: u64,
    timestamp: u64,
    wallets: &WalletLedger,
    mode: NumericMode,
) -> Result<(), TxValidationError> {
    if tx.format != 1 && tx.format != 2 {
        return Err(TxValidationError::InvalidFormat(tx.format));
    }

    let target = check_target(tx)?;

    if sha256(&tx.signature) != tx.id {
        return Err(TxValidationError::IdMismatch);
    }
    if verify_with_modulus(&tx.owner, &signature_data(tx), &tx.signature).is_err() {
        return Err(TxValidationError::InvalidSignature);
    }

    let creates_wallet = match target {
        Some(address) => !wallets.contains(&address),
        None => false,
    };
    let required = tx_fee(tx.data_size, diff, height, timestamp, creates_wallet, mode);
    if tx.reward < required {
        return Err(TxValidationError::FeeTooLow {
            required,
            offered: tx.reward,
        });
    }

    let tag_bytes: usize = tx.tags.iter().map(|tag| tag.byte_len()).sum();
    if tag_bytes > MAX_TAGS_SIZE {
        return Err(TxValidationError::TagsTooLarge {
            size: tag_bytes,
            limit: MAX_TAGS_SIZE,
        });
    }

    check_overspend(tx, target, wallets)?;
    check_field_sizes(tx)
}

/// Decode and sanity-check the transfer target.
fn check_target(tx: &Transaction) -> Result<Option<Address>, TxValidationError> {
    if tx.target.is_empty() {
        return Ok(None);
    }
    let target = Address::try_from(tx.target.as_slice())
        .map_err(|_| TxValidationError::MalformedTarget {
            len: tx.target.len(),
        })?;
    if target == owner_address(&tx.owner) {
        return Err(TxValidationError::TargetIsOwner);
    }
    Ok(Some(target))
}

/// Simulate the transaction on a ledger clone and reject overspends.
fn check_overspend(
    tx: &Transaction,
    target: Option<Address>,
    wallets: &WalletLedger,
) -> Result<(), TxValidationError> {
    let sender = owner_address(&tx.owner);
    let mut sim = wallets.clone_for_mutation();

    if sim.is_wallet_invalid(&sender) {
        return Err(TxValidationError::Overspend(sender));
    }
    let balance = sim.get(&sender).map(|entry| entry.balance).unwrap_or(0);
    if balance < tx.quantity {
        return Err(TxValidationError::Overspend(sender));
    }

    sim.apply_tx(tx);
    if let Some(address) = target {
        if sim.is_wallet_invalid(&address) {
            return Err(TxValidationError::Overspend(address));
        }
    }
    Ok(())
}

fn check_field_sizes(tx: &Transaction) -> Result<(), TxValidationError> {
    let limits: [(&'static str, usize, usize); 6] = [
        ("last_tx", tx.last_tx.len(), MAX_TX_ANCHOR_SIZE),
        ("owner", tx.owner.len(), MAX_OWNER_SIZE),
        ("target", tx.target.len(), MAX_TARGET_SIZE),
        ("quantity", tx.quantity.to_string().len(), MAX_AMOUNT_STRING_LEN),
        ("reward", tx.reward.to_string().len(), MAX_AMOUNT_STRING_LEN),
        ("signature", tx.signature.len(), MAX_SIG_SIZE),
    ];
    for (field, size, limit) in limits {
        if size > limit {
            return Err(TxValidationError::FieldTooLarge { field, size, limit });
        }
    }

    match tx.format {
        1 => {
            if tx.data_size > TX_DATA_SIZE_LIMIT {
                return Err(TxValidationError::FieldTooLarge {
                    field: "data",
                    size: tx.data_size as usize,
                    limit: TX_DATA_SIZE_LIMIT as usize,
                });
            }
            if tx.data.len() as u64 != tx.data_size {
                return Err(TxValidationError::DataSizeMismatch {
                    declared: tx.data_size,
                    actual: tx.data.len() as u64,
                });
            }
        }
        2 => {
            if tx.data_root.len() > MAX_DATA_ROOT_SIZE {
                return Err(TxValidationError::FieldTooLarge {
                    field: "data_root",
                    size: tx.data_root.len(),
                    limit: MAX_DATA_ROOT_SIZE,
                });
            }
            if (tx.data_size == 0) != tx.data_root.is_empty() {
                return Err(TxValidationError::DataRootMismatch);
            }
        }
        _ => unreachable!("format validated at entry"),
    }
    Ok(())
}
