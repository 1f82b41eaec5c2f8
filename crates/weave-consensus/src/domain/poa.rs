//! # Proof of Access
//!
//! A block producer must prove possession of a pseudo-randomly chosen
//! "recall byte" of weave history: the byte's position derives from the
//! previous block's identity, the block index locates the challenge block
//! owning it, and a two-level Merkle proof (block tx root -> transaction
//! data root -> chunk) pins the actual chunk bytes.
//!
//! Higher recall options re-hash the seed to pick a different byte; they
//! cost proportionally more hash work *and* carry a difficulty penalty
//! (`difficulty::poa_modified_diff`), so shopping for a convenient byte
//! never pays.

use shared_crypto::hashing::{multihash, sha256};
use shared_types::constants::{CHUNK_SIZE, MAX_PATH_SIZE, MAX_POA_OPTION_DEPTH};
use shared_types::{BlockIndex, Poa, H384, U256};
use tracing::debug;

use crate::algorithms::merkle::validate_path;

use super::block_index::find_recall_entry;

/// The recall byte for a given seed and option.
pub fn recall_byte(prev_indep_hash: &H384, option: u64, prev_weave_size: u64) -> u64 {
    let digest = multihash(prev_indep_hash, option);
    (U256::from_big_endian(&digest) % U256::from(prev_weave_size)).as_u64()
}

/// Verify a proof of access against the previous block's identity and the
/// block index.
///
/// Failure is an expected outcome: every dead end reports plain `false`,
/// and no step is retried.
pub fn validate_poa(
    prev_indep_hash: &H384,
    prev_weave_size: u64,
    block_index: &BlockIndex,
    poa: &Poa,
) -> bool {
    // An empty weave has nothing to prove access to.
    if prev_weave_size == 0 {
        return true;
    }

    if poa.option == 0 {
        return false;
    }
    if poa.option > block_index.len() as u64 && poa.option > MAX_POA_OPTION_DEPTH {
        debug!(option = poa.option, "PoA option beyond index and depth cap");
        return false;
    }
    if poa.tx_path.len() > MAX_PATH_SIZE
        || poa.data_path.len() > MAX_PATH_SIZE
        || poa.chunk.len() > CHUNK_SIZE
    {
        return false;
    }

    let recall = recall_byte(prev_indep_hash, poa.option, prev_weave_size);
    let Some((entry, base, top)) = find_recall_entry(block_index, recall) else {
        debug!(recall, "recall byte not covered by block index");
        return false;
    };

    let block_offset = recall - base;
    let Some(tx_proof) = validate_path(&entry.tx_root, block_offset, 0, top - base, &poa.tx_path)
    else {
        debug!(recall, "tx path invalid");
        return false;
    };

    // The tx proof yields the transaction's data root and its byte range
    // within the challenge block; the data path descends from there.
    let tx_offset = block_offset - tx_proof.left_bound;
    let tx_size = tx_proof.right_bound - tx_proof.left_bound;
    let Some(chunk_proof) = validate_path(&tx_proof.data, tx_offset, 0, tx_size, &poa.data_path)
    else {
        debug!(recall, "data path invalid");
        return false;
    };

    sha256(&poa.chunk) == chunk_proof.data
}
