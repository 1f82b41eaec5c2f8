//! # Block Hashing
//!
//! The block data segment (BDS) and the independent hash. The BDS splits
//! into a base over the fields fixed at mining start and an outer segment
//! over the time-varying fields, so miners re-hash as little as possible
//! per nonce attempt; validators recompute both.
//!
//! The difficulty contributes its canonical decimal *string* verbatim:
//! re-rendering the number is not guaranteed to reproduce historical
//! strings, so the string is the consensus form here.

use shared_crypto::hashing::Hash384;
use shared_types::{Block, Transaction, H256};

use crate::algorithms::chunks::v1_data_root;
use crate::algorithms::deep_hash::{deep_hash, DeepHashChunk};
use crate::algorithms::merkle::generate_tree;

fn tags_chunk(block: &Block) -> DeepHashChunk {
    DeepHashChunk::List(
        block
            .tags
            .iter()
            .map(|tag| {
                DeepHashChunk::list(vec![
                    DeepHashChunk::blob(tag.name.clone()),
                    DeepHashChunk::blob(tag.value.clone()),
                ])
            })
            .collect(),
    )
}

/// Deep hash over the fields fixed once the transaction set is chosen.
pub fn block_data_segment_base(block: &Block) -> Hash384 {
    let tx_ids = DeepHashChunk::List(
        block
            .txs
            .iter()
            .map(|tx| DeepHashChunk::blob(tx.id.to_vec()))
            .collect(),
    );
    let reward_addr = DeepHashChunk::blob(
        block
            .reward_addr
            .map(|address| address.to_vec())
            .unwrap_or_default(),
    );
    deep_hash(&DeepHashChunk::list(vec![
        DeepHashChunk::decimal(block.height as u128),
        DeepHashChunk::blob(block.previous_block.to_vec()),
        DeepHashChunk::blob(block.tx_root.to_vec()),
        tx_ids,
        DeepHashChunk::decimal(block.block_size as u128),
        DeepHashChunk::decimal(block.weave_size as u128),
        reward_addr,
        tags_chunk(block),
    ]))
}

/// Deep hash over the base segment plus the fields a miner varies.
pub fn block_data_segment(block: &Block) -> Hash384 {
    let base = block_data_segment_base(block);
    let poa = DeepHashChunk::list(vec![
        DeepHashChunk::decimal(block.poa.option as u128),
        DeepHashChunk::blob(block.poa.tx_path.clone()),
        DeepHashChunk::blob(block.poa.data_path.clone()),
        DeepHashChunk::blob(block.poa.chunk.clone()),
    ]);
    deep_hash(&DeepHashChunk::list(vec![
        DeepHashChunk::blob(base.to_vec()),
        DeepHashChunk::decimal(block.timestamp as u128),
        DeepHashChunk::decimal(block.last_retarget as u128),
        DeepHashChunk::blob(block.diff_string.as_bytes().to_vec()),
        DeepHashChunk::blob(block.cumulative_diff.to_string().into_bytes()),
        DeepHashChunk::decimal(block.reward_pool),
        DeepHashChunk::blob(block.wallet_list.to_vec()),
        poa,
    ]))
}

/// The independent hash: deep hash of BDS, PoW hash and nonce.
pub fn indep_hash(block: &Block) -> Hash384 {
    let bds = block_data_segment(block);
    indep_hash_from_segment(&bds, block)
}

/// [`indep_hash`] with an already-computed BDS, so validators hash the
/// segment once across gates.
pub fn indep_hash_from_segment(bds: &Hash384, block: &Block) -> Hash384 {
    deep_hash(&DeepHashChunk::list(vec![
        DeepHashChunk::blob(bds.to_vec()),
        DeepHashChunk::blob(block.hash.to_vec()),
        DeepHashChunk::blob(block.nonce.clone()),
    ]))
}

/// The proof-of-work preimage: nonce followed by the BDS.
pub fn pow_input(bds: &Hash384, nonce: &[u8]) -> Vec<u8> {
    let mut input = Vec::with_capacity(nonce.len() + bds.len());
    input.extend_from_slice(nonce);
    input.extend_from_slice(bds);
    input
}

/// The Merkle root over a block's size-tagged transaction list.
///
/// Transactions sort by format then id (byte order over the fixed-width
/// ids); each contributes its data root keyed by the cumulative data
/// offset. A block without transactions carries the zero root.
pub fn compute_tx_root(txs: &[Transaction]) -> H256 {
    if txs.is_empty() {
        return [0u8; 32];
    }

    let mut ordered: Vec<&Transaction> = txs.iter().collect();
    ordered.sort_by(|a, b| a.format.cmp(&b.format).then_with(|| a.id.cmp(&b.id)));

    let mut leaves = Vec::with_capacity(ordered.len());
    let mut offset = 0u64;
    for tx in ordered {
        offset += tx.data_size;
        let data_root = match tx.format {
            1 => v1_data_root(&tx.data),
            _ => tx.data_root.clone(),
        };
        leaves.push((data_root, offset));
    }

    generate_tree(&leaves)
        .map(|tree| tree.id())
        .expect("non-empty tx list yields leaves")
}
