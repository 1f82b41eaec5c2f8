//! # Block Index
//!
//! The newest-first chain summary: an unbalanced hash list whose root
//! commits to every block behind the tip, and the recall-range scan PoA
//! uses to locate a challenge block.

use shared_crypto::hashing::{sha384_many, Hash384};
use shared_types::{Block, BlockIndex, BlockIndexEntry, H256, H384};

use crate::algorithms::deep_hash::{deep_hash, DeepHashChunk};

/// Deep hash of one block-index entry.
pub fn entry_hash(block_hash: &H384, weave_size: u64, tx_root: &H256) -> Hash384 {
    deep_hash(&DeepHashChunk::list(vec![
        DeepHashChunk::blob(block_hash.to_vec()),
        DeepHashChunk::decimal(weave_size as u128),
        DeepHashChunk::blob(tx_root.to_vec()),
    ]))
}

/// Extend an unbalanced hash-list root by one entry:
/// `H(prev_root ++ entry_hash)`.
pub fn extend_root(prev_root: &H384, entry: Hash384) -> Hash384 {
    sha384_many(&[prev_root, &entry])
}

/// The block-index root a block at `prev_block.height + 1` must carry:
/// the previous block's root extended with the previous block itself.
pub fn compute_hash_list_merkle(prev_block: &Block) -> Hash384 {
    extend_root(
        &prev_block.hash_list_merkle,
        entry_hash(
            &prev_block.indep_hash,
            prev_block.weave_size,
            &prev_block.tx_root,
        ),
    )
}

/// Locate the block-index entry owning `recall_byte`.
///
/// Entries are newest first with cumulative weave sizes; the owning entry
/// is the oldest one whose cumulative size still exceeds the recall byte.
/// Returns the entry with its `[base, top)` absolute byte range.
pub fn find_recall_entry(
    block_index: &BlockIndex,
    recall_byte: u64,
) -> Option<(&BlockIndexEntry, u64, u64)> {
    for (i, entry) in block_index.iter().enumerate() {
        let base = block_index
            .get(i + 1)
            .map(|older| older.weave_size)
            .unwrap_or(0);
        if recall_byte >= base && recall_byte < entry.weave_size {
            return Some((entry, base, entry.weave_size));
        }
    }
    None
}
