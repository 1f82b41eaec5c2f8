//! # SHA-2 Hashing
//!
//! One-shot and multi-input helpers over the two digest widths the weave
//! uses: SHA-256 for Merkle node ids and transaction ids, SHA-384 for
//! structural (deep) hashes and block identities.

use sha2::{Digest, Sha256, Sha384};

/// SHA-256 output (256-bit).
pub type Hash256 = [u8; 32];

/// SHA-384 output (384-bit).
pub type Hash384 = [u8; 48];

/// Hash data with SHA-256 (one-shot).
pub fn sha256(data: &[u8]) -> Hash256 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash multiple inputs with SHA-256.
pub fn sha256_many(inputs: &[&[u8]]) -> Hash256 {
    let mut hasher = Sha256::new();
    for input in inputs {
        hasher.update(input);
    }
    hasher.finalize().into()
}

/// Hash data with SHA-384 (one-shot).
pub fn sha384(data: &[u8]) -> Hash384 {
    let mut hasher = Sha384::new();
    hasher.update(data);
    let mut output = [0u8; 48];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Hash multiple inputs with SHA-384.
pub fn sha384_many(inputs: &[&[u8]]) -> Hash384 {
    let mut hasher = Sha384::new();
    for input in inputs {
        hasher.update(input);
    }
    let mut output = [0u8; 48];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Apply SHA-256 to `seed` `n` times in sequence.
///
/// `n == 0` returns the seed unchanged. Each extra application costs one
/// full hash, which is what makes higher PoA recall options proportionally
/// more expensive to evaluate.
pub fn multihash(seed: &[u8], n: u64) -> Vec<u8> {
    if n == 0 {
        return seed.to_vec();
    }
    let mut digest = sha256(seed);
    for _ in 1..n {
        digest = sha256(&digest);
    }
    digest.to_vec()
}
