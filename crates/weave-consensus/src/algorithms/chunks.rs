//! # Format-1 Chunk Trees
//!
//! Format-1 transactions carry their payload inline; for Merkle purposes
//! the payload is split into fixed-size chunks and committed to exactly
//! like format-2 external data, so both formats contribute uniform
//! `(data_root, end_offset)` leaves to the block transaction root.

use shared_crypto::hashing::sha256;
use shared_types::constants::CHUNK_SIZE;

use super::merkle::generate_tree;

/// Compute the data root of an inline payload.
///
/// Chunks are `CHUNK_SIZE` bytes, the last one short. Returns the empty
/// vector for empty data, matching the empty `data_root` sentinel of
/// zero-size transactions.
pub fn v1_data_root(data: &[u8]) -> Vec<u8> {
    if data.is_empty() {
        return Vec::new();
    }

    let mut leaves = Vec::with_capacity(data.len() / CHUNK_SIZE + 1);
    let mut offset = 0u64;
    for chunk in data.chunks(CHUNK_SIZE) {
        offset += chunk.len() as u64;
        leaves.push((sha256(chunk).to_vec(), offset));
    }

    let tree = generate_tree(&leaves).expect("non-empty data yields leaves");
    tree.id().to_vec()
}
